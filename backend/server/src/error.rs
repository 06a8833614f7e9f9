use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use criteria::ValidationError;
use serde_json::json;
use thiserror::Error;

use crate::{database::StoreError, report::ReportError, storage::StorageError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing required data")]
    MissingData,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to save data: {0}")]
    Persistence(#[from] StoreError),

    /// Non-fatal once the row exists, see `routes::save_submission_handler`.
    #[error("{0}")]
    PdfStorage(#[from] StorageError),

    #[error("{0}")]
    Report(#[from] ReportError),

    #[error("Server error: {0}")]
    Unexpected(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingData { .. }
            | AppError::MalformedPayload { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Persistence { .. }
            | AppError::PdfStorage { .. }
            | AppError::Report { .. }
            | AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
