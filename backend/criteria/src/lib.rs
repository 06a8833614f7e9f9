//! # Criteria
//!
//! Shared between the server and the terminal client.
//!
//! - [`model`]: the five fixed criteria, rankings, comparisons and the submission payload
//! - [`flow`]: the ranking/comparison session as a state machine
//! - [`validate`]: structural checks the server runs before storing a submission
pub mod flow;
pub mod model;
pub mod validate;

pub use flow::{Event, Flow, FlowError, Stage};
pub use model::{
    CATALOGUE, Comparison, Criterion, Importance, RankedCriterion, SAVE_SUBMISSION_PATH,
    SubmissionRequest,
};
pub use validate::{ValidationError, validate};
