use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The five fixed laptop-selection criteria, in catalogue order.
pub const CATALOGUE: [(&str, &str); 5] = [
    ("C-1", "Performance"),
    ("C-2", "Battery Life"),
    ("C-3", "Display Quality"),
    ("C-4", "Portability"),
    ("C-5", "Price"),
];

pub const SAVE_SUBMISSION_PATH: &str = "/api/save-submission";

pub const CRITERIA_COUNT: usize = CATALOGUE.len();

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = CRITERIA_COUNT as u8;

pub fn catalogue_name(id: &str) -> Option<&'static str> {
    CATALOGUE
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub rank: Option<u8>,
}

impl Criterion {
    /// Fresh, unranked copies of the catalogue.
    pub fn catalogue() -> Vec<Criterion> {
        CATALOGUE
            .iter()
            .map(|(id, name)| Criterion {
                id: id.to_string(),
                name: name.to_string(),
                rank: None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCriterion {
    pub id: String,
    pub name: String,
    pub rank: u8,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Importance must be between 1 and 9, got {0}")]
pub struct ImportanceOutOfRange(pub u8);

/// Saaty scale value: how many times more important one criterion is than another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Importance(u8);

impl Importance {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub const EQUAL: Importance = Importance(Self::MIN);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Importance {
    fn default() -> Self {
        Self::EQUAL
    }
}

impl TryFrom<u8> for Importance {
    type Error = ImportanceOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Importance(value))
        } else {
            Err(ImportanceOutOfRange(value))
        }
    }
}

impl From<Importance> for u8 {
    fn from(importance: Importance) -> Self {
        importance.0
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub criterion1: RankedCriterion,
    pub criterion2: RankedCriterion,
    pub importance: Importance,
}

impl Comparison {
    /// Reads as "`criterion2` is `importance` times more important than `criterion1`".
    pub fn sentence(&self) -> String {
        format!(
            "{} is {} times more important than {}",
            self.criterion2.name, self.importance, self.criterion1.name
        )
    }
}

/// One comparison per adjacent pair of `ranked`, all starting at equal importance.
pub fn adjacent_comparisons(ranked: &[RankedCriterion]) -> Vec<Comparison> {
    ranked
        .windows(2)
        .map(|pair| Comparison {
            criterion1: pair[0].clone(),
            criterion2: pair[1].clone(),
            importance: Importance::EQUAL,
        })
        .collect()
}

/// Body of `POST /api/save-submission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub ranked_criteria: Vec<RankedCriterion>,
    pub comparisons: Vec<Comparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(id: &str, rank: u8) -> RankedCriterion {
        RankedCriterion {
            id: id.to_string(),
            name: catalogue_name(id).unwrap().to_string(),
            rank,
        }
    }

    #[test]
    fn test_importance_bounds() {
        assert_eq!(Importance::try_from(0), Err(ImportanceOutOfRange(0)));
        assert_eq!(Importance::try_from(1).map(Importance::get), Ok(1));
        assert_eq!(Importance::try_from(9).map(Importance::get), Ok(9));
        assert_eq!(Importance::try_from(10), Err(ImportanceOutOfRange(10)));
    }

    #[test]
    fn test_importance_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Importance>("0").is_err());
        assert!(serde_json::from_str::<Importance>("10").is_err());
        assert_eq!(
            serde_json::from_str::<Importance>("7").unwrap(),
            Importance::try_from(7).unwrap()
        );
    }

    #[test]
    fn test_adjacent_comparisons() {
        let order = [ranked("C-2", 1), ranked("C-1", 2), ranked("C-3", 3)];
        let comparisons = adjacent_comparisons(&order);

        assert_eq!(comparisons.len(), order.len() - 1);
        assert_eq!(comparisons[0].criterion1.id, "C-2");
        assert_eq!(comparisons[0].criterion2.id, "C-1");
        assert_eq!(comparisons[1].criterion1.id, "C-1");
        assert_eq!(comparisons[1].criterion2.id, "C-3");
        assert!(comparisons.iter().all(|c| c.importance == Importance::EQUAL));
    }

    #[test]
    fn test_sentence() {
        let comparison = Comparison {
            criterion1: ranked("C-4", 2),
            criterion2: ranked("C-5", 1),
            importance: Importance::try_from(3).unwrap(),
        };

        assert_eq!(
            comparison.sentence(),
            "Price is 3 times more important than Portability"
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = SubmissionRequest {
            ranked_criteria: vec![ranked("C-1", 1)],
            comparisons: Vec::new(),
            request_token: None,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "ranked_criteria": [{ "id": "C-1", "name": "Performance", "rank": 1 }],
                "comparisons": []
            })
        );
    }
}
