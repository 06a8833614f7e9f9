use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use chrono::{Local, Utc};
use criteria::{SubmissionRequest, validate};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    database::{Inserted, NewSubmission, SubmissionId},
    error::AppError,
    report::{layout, render},
    state::AppState,
    storage::report_key,
    utils::get_submission_from_body,
};

pub const SAVED: &str = "Data saved successfully. PDF stored privately.";
pub const ALREADY_RECORDED: &str = "Submission already recorded.";
pub const PDF_FAILED: &str = "Data saved but PDF storage failed";

#[derive(Debug, Serialize, Deserialize)]
pub struct Saved {
    pub success: bool,
    pub message: String,
}

impl Saved {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

pub async fn save_submission_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Saved>, AppError> {
    let request =
        get_submission_from_body(&body).inspect_err(|e| warn!("Rejected submission: {e}"))?;
    validate(&request).inspect_err(|e| warn!("Rejected submission: {e}"))?;

    let record = NewSubmission::new(&request, Utc::now());

    let submission_id = match state.submissions.insert(&record).await {
        Ok(Inserted::Created(id)) => id,
        Ok(Inserted::Duplicate) => {
            info!("Submission with token {:?} already recorded", request.request_token);
            return Ok(Saved::new(ALREADY_RECORDED));
        }
        Err(e) => {
            error!("Database error: {e}");
            return Err(AppError::Persistence(e));
        }
    };

    info!("Stored submission {submission_id}");

    match store_report(&state, &request, &submission_id).await {
        Ok(key) => {
            info!("Stored report {key}");
            Ok(Saved::new(SAVED))
        }
        Err(e) => {
            warn!("PDF step failed for submission {submission_id}: {e}");
            Ok(Saved::new(format!("{PDF_FAILED}: {e}")))
        }
    }
}

async fn store_report(
    state: &AppState,
    request: &SubmissionRequest,
    submission_id: &SubmissionId,
) -> Result<String, AppError> {
    let generated_at = Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string();
    let report = layout(
        &request.ranked_criteria,
        &request.comparisons,
        &submission_id.0,
        &generated_at,
    );
    let pdf = render(&report)?;

    let key = report_key(submission_id);
    state.reports.upload(&key, pdf).await?;

    Ok(key)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
