use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    database::{Inserted, NewSubmission, StoreError, SubmissionId, SubmissionStore},
    storage::{PdfStore, StorageError},
};

/// In-memory stand-in for the table and the bucket.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<(SubmissionId, NewSubmission)>>,
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_inserts: bool,
    pub fail_uploads: bool,
}

impl FakeStore {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SubmissionStore for FakeStore {
    async fn insert(&self, submission: &NewSubmission) -> Result<Inserted, StoreError> {
        if self.fail_inserts {
            return Err(StoreError::Rejected("database unavailable".to_string()));
        }

        let mut rows = self.rows.lock().await;

        if let Some(token) = submission.request_token {
            if rows.iter().any(|(_, row)| row.request_token == Some(token)) {
                return Ok(Inserted::Duplicate);
            }
        }

        let id = SubmissionId((rows.len() + 1).to_string());
        rows.push((id.clone(), submission.clone()));

        Ok(Inserted::Created(id))
    }
}

#[async_trait]
impl PdfStore for FakeStore {
    async fn upload(&self, key: &str, pdf: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Rejected("bucket unavailable".to_string()));
        }

        let mut objects = self.objects.lock().await;
        if objects.contains_key(key) {
            return Err(StorageError::Rejected("The resource already exists".to_string()));
        }

        objects.insert(key.to_string(), pdf);

        Ok(())
    }
}
