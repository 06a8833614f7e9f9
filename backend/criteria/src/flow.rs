//! # Weighing Flow
//!
//! Client logic behind a single weighing session.
//!
//! ## Stages
//!
//! `Ranking -> Comparing -> Submitted`, strictly forward. The only way back is [`Event::Reset`],
//! which behaves like reloading the page: every rank goes back to unset.
//!
//! ### Ranking
//! - Each of the five criteria gets a rank 1-5 (1 = most important)
//! - Ranks can be overwritten or cleared freely until confirmed
//! - Confirming needs every criterion ranked, each rank used once
//!
//! ### Comparing
//! - Ranked criteria are paired with their neighbour, 4 comparisons for 5 criteria
//! - Each pair reads "second is N times more important than first", N on the 1-9 Saaty scale
//! - One comparison is displayed at a time, the cursor walks forward and back, clamped at both ends
//! - Submitting re-reads whatever value is displayed so an edit on the last screen is not lost
//! - The request token is fixed on entry, so a retried submit is recognised by the server
//!
//! ### Submitted
//! - Terminal, only the server message is kept for display
//!
//! ## Reducer
//!
//! [`Flow::reduce`] never mutates. It hands back the next state or an error, and the caller
//! keeps the previous state on error. The network call for submitting sits outside; only a
//! successful response is fed back as [`Event::Submitted`].
use std::{collections::HashSet, fmt};

use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    Comparison, Criterion, Importance, ImportanceOutOfRange, MAX_RANK, MIN_RANK, RankedCriterion,
    SubmissionRequest, adjacent_comparisons,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ranking,
    Comparing,
    Submitted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ranking => "ranking",
            Stage::Comparing => "comparing",
            Stage::Submitted => "submitted",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetRank { id: String, rank: Option<u8> },
    ConfirmRanks { request_token: Uuid },
    SetImportance { index: usize, value: u8 },
    Next,
    Previous,
    Submitted { message: String },
    Reset,
}

impl Event {
    pub fn confirm_ranks() -> Self {
        Event::ConfirmRanks {
            request_token: Uuid::new_v4(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Event::SetRank { .. } => "set rank",
            Event::ConfirmRanks { .. } => "confirm ranks",
            Event::SetImportance { .. } => "set importance",
            Event::Next => "next",
            Event::Previous => "previous",
            Event::Submitted { .. } => "submitted",
            Event::Reset => "reset",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Cannot {event} while {stage}")]
    NotAvailable { event: &'static str, stage: Stage },

    #[error("Unknown criterion {0}")]
    UnknownCriterion(String),

    #[error("Rank must be between 1 and 5, got {0}")]
    RankOutOfRange(u8),

    #[error("Please rank all criteria")]
    IncompleteRanking,

    #[error("Rank {0} is given to more than one criterion")]
    DuplicateRank(u8),

    #[error(transparent)]
    Importance(#[from] ImportanceOutOfRange),

    #[error("No comparison at position {0}")]
    NoSuchComparison(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Ranking(Ranking),
    Comparing(Comparing),
    Submitted(Submitted),
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}

impl Flow {
    pub fn new() -> Self {
        Flow::Ranking(Ranking::new())
    }

    pub fn stage(&self) -> Stage {
        match self {
            Flow::Ranking(_) => Stage::Ranking,
            Flow::Comparing(_) => Stage::Comparing,
            Flow::Submitted(_) => Stage::Submitted,
        }
    }

    pub fn reduce(&self, event: Event) -> Result<Flow, FlowError> {
        match (self, event) {
            (_, Event::Reset) => Ok(Flow::new()),

            (Flow::Ranking(ranking), Event::SetRank { id, rank }) => {
                ranking.set_rank(&id, rank).map(Flow::Ranking)
            }
            (Flow::Ranking(ranking), Event::ConfirmRanks { request_token }) => {
                ranking.confirm(request_token).map(Flow::Comparing)
            }

            (Flow::Comparing(comparing), Event::SetImportance { index, value }) => {
                comparing.set_importance(index, value).map(Flow::Comparing)
            }
            (Flow::Comparing(comparing), Event::Next) => Ok(Flow::Comparing(comparing.next())),
            (Flow::Comparing(comparing), Event::Previous) => {
                Ok(Flow::Comparing(comparing.previous()))
            }
            (Flow::Comparing(_), Event::Submitted { message }) => {
                Ok(Flow::Submitted(Submitted { message }))
            }

            (state, event) => Err(FlowError::NotAvailable {
                event: event.name(),
                stage: state.stage(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    criteria: Vec<Criterion>,
}

impl Default for Ranking {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranking {
    pub fn new() -> Self {
        Self {
            criteria: Criterion::catalogue(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Overwrites one rank. Duplicates are only caught on confirm.
    pub fn set_rank(&self, id: &str, rank: Option<u8>) -> Result<Ranking, FlowError> {
        if let Some(value) = rank {
            if !(MIN_RANK..=MAX_RANK).contains(&value) {
                return Err(FlowError::RankOutOfRange(value));
            }
        }

        let mut next = self.clone();
        let criterion = next
            .criteria
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| FlowError::UnknownCriterion(id.to_string()))?;
        criterion.rank = rank;

        Ok(next)
    }

    pub fn confirm(&self, request_token: Uuid) -> Result<Comparing, FlowError> {
        let mut ranked = self
            .criteria
            .iter()
            .map(|c| {
                c.rank.map(|rank| RankedCriterion {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    rank,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(FlowError::IncompleteRanking)?;

        let mut seen = HashSet::new();
        for criterion in &ranked {
            if !seen.insert(criterion.rank) {
                return Err(FlowError::DuplicateRank(criterion.rank));
            }
        }

        ranked.sort_by_key(|c| c.rank);

        Ok(Comparing::new(ranked, request_token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparing {
    ranked_criteria: Vec<RankedCriterion>,
    comparisons: Vec<Comparison>,
    cursor: usize,
    request_token: Uuid,
}

impl Comparing {
    pub fn new(ranked_criteria: Vec<RankedCriterion>, request_token: Uuid) -> Self {
        let comparisons = adjacent_comparisons(&ranked_criteria);

        Self {
            ranked_criteria,
            comparisons,
            cursor: 0,
            request_token,
        }
    }

    pub fn ranked_criteria(&self) -> &[RankedCriterion] {
        &self.ranked_criteria
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Comparison> {
        self.comparisons.get(self.cursor)
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.comparisons.len()
    }

    pub fn request_token(&self) -> Uuid {
        self.request_token
    }

    pub fn set_importance(&self, index: usize, value: u8) -> Result<Comparing, FlowError> {
        let importance = Importance::try_from(value)?;

        let mut next = self.clone();
        let comparison = next
            .comparisons
            .get_mut(index)
            .ok_or(FlowError::NoSuchComparison(index))?;
        comparison.importance = importance;

        Ok(next)
    }

    pub fn next(&self) -> Comparing {
        let last = self.comparisons.len().saturating_sub(1);

        Comparing {
            cursor: (self.cursor + 1).min(last),
            ..self.clone()
        }
    }

    pub fn previous(&self) -> Comparing {
        Comparing {
            cursor: self.cursor.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Payload to send, with `displayed` overriding the comparison under the cursor.
    pub fn submission(&self, displayed: Option<Importance>) -> SubmissionRequest {
        let mut comparisons = self.comparisons.clone();

        if let (Some(importance), Some(current)) = (displayed, comparisons.get_mut(self.cursor)) {
            current.importance = importance;
        }

        SubmissionRequest {
            ranked_criteria: self.ranked_criteria.clone(),
            comparisons,
            request_token: Some(self.request_token),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CATALOGUE;

    fn token() -> Uuid {
        Uuid::from_u128(7)
    }

    fn ranked_flow(ranks: &[(&str, u8)]) -> Result<Flow, FlowError> {
        let mut flow = Flow::new();
        for (id, rank) in ranks {
            flow = flow.reduce(Event::SetRank {
                id: id.to_string(),
                rank: Some(*rank),
            })?;
        }

        flow.reduce(Event::ConfirmRanks {
            request_token: token(),
        })
    }

    fn comparing(flow: &Flow) -> &Comparing {
        match flow {
            Flow::Comparing(comparing) => comparing,
            other => panic!("expected comparing, got {:?}", other.stage()),
        }
    }

    fn permutations(items: Vec<u8>) -> Vec<Vec<u8>> {
        if items.len() <= 1 {
            return vec![items];
        }

        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_example_session() {
        let flow = ranked_flow(&[("C-1", 2), ("C-2", 1), ("C-3", 3), ("C-4", 5), ("C-5", 4)])
            .unwrap();
        let comparing = comparing(&flow);

        let order: Vec<&str> = comparing
            .ranked_criteria()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(order, ["C-2", "C-1", "C-3", "C-5", "C-4"]);

        let pairs: Vec<(&str, &str)> = comparing
            .comparisons()
            .iter()
            .map(|c| (c.criterion1.id.as_str(), c.criterion2.id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [("C-2", "C-1"), ("C-1", "C-3"), ("C-3", "C-5"), ("C-5", "C-4")]
        );
        assert!(
            comparing
                .comparisons()
                .iter()
                .all(|c| c.importance == Importance::EQUAL)
        );
    }

    #[test]
    fn test_every_permutation_sorts() {
        for ranks in permutations(vec![1, 2, 3, 4, 5]) {
            let assignment: Vec<(&str, u8)> = CATALOGUE
                .iter()
                .zip(&ranks)
                .map(|((id, _), rank)| (*id, *rank))
                .collect();
            let flow = ranked_flow(&assignment).unwrap();
            let comparing = comparing(&flow);
            let ranked = comparing.ranked_criteria();

            assert_eq!(ranked.len(), CATALOGUE.len());
            assert!(ranked.windows(2).all(|pair| pair[0].rank < pair[1].rank));

            let ids: HashSet<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids.len(), CATALOGUE.len());

            assert_eq!(comparing.comparisons().len(), ranked.len() - 1);
            for (comparison, pair) in comparing.comparisons().iter().zip(ranked.windows(2)) {
                assert_eq!(comparison.criterion1, pair[0]);
                assert_eq!(comparison.criterion2, pair[1]);
            }
        }
    }

    #[test]
    fn test_incomplete_ranking_is_rejected() {
        let flow = Flow::new()
            .reduce(Event::SetRank {
                id: "C-1".to_string(),
                rank: Some(1),
            })
            .unwrap();

        let result = flow.reduce(Event::ConfirmRanks {
            request_token: token(),
        });

        assert_eq!(result, Err(FlowError::IncompleteRanking));
        assert_eq!(flow.stage(), Stage::Ranking);
    }

    #[test]
    fn test_cleared_rank_counts_as_missing() {
        let mut flow = Flow::new();
        for (id, _) in CATALOGUE {
            let rank = id[2..].parse().unwrap();
            flow = flow
                .reduce(Event::SetRank {
                    id: id.to_string(),
                    rank: Some(rank),
                })
                .unwrap();
        }
        let flow = flow
            .reduce(Event::SetRank {
                id: "C-3".to_string(),
                rank: None,
            })
            .unwrap();

        assert_eq!(
            flow.reduce(Event::confirm_ranks()),
            Err(FlowError::IncompleteRanking)
        );
    }

    #[test]
    fn test_duplicate_ranks_are_rejected_on_confirm() {
        let result = ranked_flow(&[("C-1", 3), ("C-2", 1), ("C-3", 3), ("C-4", 5), ("C-5", 4)]);

        assert_eq!(result, Err(FlowError::DuplicateRank(3)));
    }

    #[test]
    fn test_set_rank_bounds_and_ids() {
        let flow = Flow::new();

        assert_eq!(
            flow.reduce(Event::SetRank {
                id: "C-1".to_string(),
                rank: Some(0)
            }),
            Err(FlowError::RankOutOfRange(0))
        );
        assert_eq!(
            flow.reduce(Event::SetRank {
                id: "C-1".to_string(),
                rank: Some(6)
            }),
            Err(FlowError::RankOutOfRange(6))
        );
        assert_eq!(
            flow.reduce(Event::SetRank {
                id: "C-9".to_string(),
                rank: Some(1)
            }),
            Err(FlowError::UnknownCriterion("C-9".to_string()))
        );
    }

    #[test]
    fn test_importance_boundaries() {
        let flow = ranked_flow(&[("C-1", 1), ("C-2", 2), ("C-3", 3), ("C-4", 4), ("C-5", 5)])
            .unwrap();

        for rejected in [0, 10] {
            assert_eq!(
                flow.reduce(Event::SetImportance {
                    index: 0,
                    value: rejected
                }),
                Err(FlowError::Importance(ImportanceOutOfRange(rejected)))
            );
        }

        for accepted in [1, 9] {
            let next = flow
                .reduce(Event::SetImportance {
                    index: 0,
                    value: accepted,
                })
                .unwrap();
            assert_eq!(comparing(&next).comparisons()[0].importance.get(), accepted);
        }

        assert_eq!(
            flow.reduce(Event::SetImportance { index: 4, value: 2 }),
            Err(FlowError::NoSuchComparison(4))
        );
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut flow = ranked_flow(&[("C-1", 1), ("C-2", 2), ("C-3", 3), ("C-4", 4), ("C-5", 5)])
            .unwrap();

        flow = flow.reduce(Event::Previous).unwrap();
        assert_eq!(comparing(&flow).cursor(), 0);

        for _ in 0..10 {
            flow = flow.reduce(Event::Next).unwrap();
        }
        assert_eq!(comparing(&flow).cursor(), 3);
        assert!(comparing(&flow).is_last());

        flow = flow.reduce(Event::Previous).unwrap();
        assert_eq!(comparing(&flow).cursor(), 2);
    }

    #[test]
    fn test_submission_rereads_displayed_value() {
        let mut flow = ranked_flow(&[("C-1", 1), ("C-2", 2), ("C-3", 3), ("C-4", 4), ("C-5", 5)])
            .unwrap();
        flow = flow
            .reduce(Event::SetImportance { index: 1, value: 4 })
            .unwrap();
        for _ in 0..3 {
            flow = flow.reduce(Event::Next).unwrap();
        }

        let displayed = Importance::try_from(8).unwrap();
        let request = comparing(&flow).submission(Some(displayed));

        let values: Vec<u8> = request.comparisons.iter().map(|c| c.importance.get()).collect();
        assert_eq!(values, [1, 4, 1, 8]);
        assert_eq!(request.ranked_criteria.len(), 5);
        assert_eq!(request.request_token, Some(token()));
    }

    #[test]
    fn test_submitted_is_terminal_until_reset() {
        let flow = ranked_flow(&[("C-1", 1), ("C-2", 2), ("C-3", 3), ("C-4", 4), ("C-5", 5)])
            .unwrap()
            .reduce(Event::Submitted {
                message: "saved".to_string(),
            })
            .unwrap();
        assert_eq!(flow.stage(), Stage::Submitted);

        assert_eq!(
            flow.reduce(Event::Next),
            Err(FlowError::NotAvailable {
                event: "next",
                stage: Stage::Submitted
            })
        );

        let reset = flow.reduce(Event::Reset).unwrap();
        match reset {
            Flow::Ranking(ranking) => assert!(ranking.criteria().iter().all(|c| c.rank.is_none())),
            other => panic!("expected ranking, got {:?}", other.stage()),
        }
    }

    #[test]
    fn test_comparison_events_need_comparing_stage() {
        assert_eq!(
            Flow::new().reduce(Event::Submitted {
                message: String::new()
            }),
            Err(FlowError::NotAvailable {
                event: "submitted",
                stage: Stage::Ranking
            })
        );
    }
}
