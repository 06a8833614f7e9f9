//! # PDF Storage
//!
//! Write-only from the outside. Reports are uploaded to a private bucket and no route ever
//! hands back a URL or the bytes.
use async_trait::async_trait;
use reqwest::{Method, header::CONTENT_TYPE};
use thiserror::Error;

use crate::{
    database::SubmissionId,
    supabase::{Supabase, error_message},
};

pub const PDF_BUCKET: &str = "pdf-storage";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub fn report_key(submission_id: &SubmissionId) -> String {
    format!("criteria-weighing-{submission_id}.pdf")
}

#[async_trait]
pub trait PdfStore: Send + Sync {
    /// Never overwrites: an existing `key` is an error.
    async fn upload(&self, key: &str, pdf: Vec<u8>) -> Result<(), StorageError>;
}

#[async_trait]
impl PdfStore for Supabase {
    async fn upload(&self, key: &str, pdf: Vec<u8>) -> Result<(), StorageError> {
        let response = self
            .request(Method::POST, &format!("storage/v1/object/{PDF_BUCKET}/{key}"))
            .header(CONTENT_TYPE, PDF_CONTENT_TYPE)
            .header("x-upsert", "false")
            .body(pdf)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Rejected(error_message(response).await));
        }

        Ok(())
    }
}
