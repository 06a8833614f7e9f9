//! # Submissions
//!
//! Insert-only. One row per completed session, never updated or deleted from here.
//!
//! A retried submit carries the same `request_token`. The unique constraint on that column makes
//! the second insert fail with `409 Conflict`, which is reported as [`Inserted::Duplicate`].
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use criteria::{Comparison, RankedCriterion, SubmissionRequest};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::supabase::{Supabase, error_message};

pub const SUBMISSIONS_TABLE: &str = "submissions";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Insert returned no row")]
    NoRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub String);

impl From<Value> for SubmissionId {
    fn from(value: Value) -> Self {
        match value {
            Value::String(id) => SubmissionId(id),
            other => SubmissionId(other.to_string()),
        }
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub ranked_criteria: Vec<RankedCriterion>,
    pub comparisons: Vec<Comparison>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<Uuid>,
}

impl NewSubmission {
    pub fn new(request: &SubmissionRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            ranked_criteria: request.ranked_criteria.clone(),
            comparisons: request.comparisons.clone(),
            created_at,
            request_token: request.request_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted {
    Created(SubmissionId),
    Duplicate,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: &NewSubmission) -> Result<Inserted, StoreError>;
}

#[derive(Deserialize)]
struct InsertedRow {
    id: Value,
}

#[async_trait]
impl SubmissionStore for Supabase {
    async fn insert(&self, submission: &NewSubmission) -> Result<Inserted, StoreError> {
        let response = self
            .request(Method::POST, &format!("rest/v1/{SUBMISSIONS_TABLE}"))
            .header("Prefer", "return=representation")
            .json(&[submission])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT && submission.request_token.is_some() {
            return Ok(Inserted::Duplicate);
        }

        if !status.is_success() {
            return Err(StoreError::Rejected(error_message(response).await));
        }

        let rows: Vec<InsertedRow> = response.json().await?;
        let row = rows.into_iter().next().ok_or(StoreError::NoRow)?;

        Ok(Inserted::Created(row.id.into()))
    }
}
