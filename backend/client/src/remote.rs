use criteria::{SAVE_SUBMISSION_PATH, SubmissionRequest};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use crate::models::Reply;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Failed to save: {0}")]
    Server(String),

    #[error("Failed to save data. Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Sends one session. `Ok` carries the server's message and is the only outcome that may
/// advance the flow.
pub async fn submit(
    client: &Client,
    server: &str,
    request: &SubmissionRequest,
) -> Result<String, SubmitError> {
    let url = format!("{}{SAVE_SUBMISSION_PATH}", server.trim_end_matches('/'));

    let response = client.post(&url).json(request).send().await.map_err(|e| {
        error!("Network error: {e}");
        SubmitError::from(e)
    })?;

    let status = response.status();
    let body = response.text().await?;

    read_reply(status, &body)
}

pub fn read_reply(status: StatusCode, body: &str) -> Result<String, SubmitError> {
    let reply: Reply = serde_json::from_str(body).unwrap_or_default();

    if status.is_success() && reply.success {
        let message = reply.message.unwrap_or_default();
        info!("Submission saved: {message}");
        return Ok(message);
    }

    let reason = reply.error.unwrap_or_else(|| status.to_string());
    error!("Server error: {reason}");

    Err(SubmitError::Server(reason))
}
