use std::collections::HashSet;

use thiserror::Error;

use crate::model::{CRITERIA_COUNT, SubmissionRequest, catalogue_name};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected 5 ranked criteria, got {0}")]
    CriteriaCount(usize),

    #[error("Unknown criterion {0}")]
    UnknownCriterion(String),

    #[error("Criterion {id} is named {found:?}, expected {expected:?}")]
    NameMismatch {
        id: String,
        found: String,
        expected: &'static str,
    },

    #[error("Criterion {0} is ranked more than once")]
    DuplicateCriterion(String),

    #[error("Criterion {id} has rank {found} at position {expected}")]
    RankOutOfOrder { id: String, found: u8, expected: u8 },

    #[error("Expected {expected} comparisons, got {found}")]
    ComparisonCount { expected: usize, found: usize },

    #[error("Comparison {0} does not pair adjacent ranked criteria")]
    NotAdjacent(usize),
}

/// Structural checks on a submission before it is stored.
///
/// Ranked criteria must be the whole catalogue, each once, ranked `1..=5` in order.
/// Comparison `i` must pair ranked criteria `i` and `i + 1`. Importance bounds are
/// already enforced when the payload is decoded.
pub fn validate(request: &SubmissionRequest) -> Result<(), ValidationError> {
    let ranked = &request.ranked_criteria;

    if ranked.len() != CRITERIA_COUNT {
        return Err(ValidationError::CriteriaCount(ranked.len()));
    }

    let mut seen = HashSet::new();
    for (position, criterion) in ranked.iter().enumerate() {
        let expected_name = catalogue_name(&criterion.id)
            .ok_or_else(|| ValidationError::UnknownCriterion(criterion.id.clone()))?;

        if criterion.name != expected_name {
            return Err(ValidationError::NameMismatch {
                id: criterion.id.clone(),
                found: criterion.name.clone(),
                expected: expected_name,
            });
        }

        if !seen.insert(criterion.id.as_str()) {
            return Err(ValidationError::DuplicateCriterion(criterion.id.clone()));
        }

        let expected_rank = position as u8 + 1;
        if criterion.rank != expected_rank {
            return Err(ValidationError::RankOutOfOrder {
                id: criterion.id.clone(),
                found: criterion.rank,
                expected: expected_rank,
            });
        }
    }

    let expected = ranked.len() - 1;
    if request.comparisons.len() != expected {
        return Err(ValidationError::ComparisonCount {
            expected,
            found: request.comparisons.len(),
        });
    }

    let pairs = request.comparisons.iter().zip(ranked.windows(2));
    for (index, (comparison, pair)) in pairs.enumerate() {
        if comparison.criterion1 != pair[0] || comparison.criterion2 != pair[1] {
            return Err(ValidationError::NotAdjacent(index));
        }
    }

    Ok(())
}
