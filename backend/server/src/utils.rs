use axum::body::Bytes;
use criteria::{Comparison, RankedCriterion, SubmissionRequest};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError::{self, MalformedPayload, MissingData};

#[derive(Deserialize)]
struct RawSubmission {
    #[serde(default)]
    ranked_criteria: Option<Value>,

    #[serde(default)]
    comparisons: Option<Value>,

    #[serde(default)]
    request_token: Option<Uuid>,
}

/// Absent and `null` both count as missing. Presence is checked before either field is decoded.
pub fn get_submission_from_body(body: &Bytes) -> Result<SubmissionRequest, AppError> {
    let raw: RawSubmission =
        serde_json::from_slice(body).map_err(|e| MalformedPayload(e.to_string()))?;

    let (Some(ranked_criteria), Some(comparisons)) = (raw.ranked_criteria, raw.comparisons) else {
        return Err(MissingData);
    };

    Ok(SubmissionRequest {
        ranked_criteria: decode_field::<Vec<RankedCriterion>>("ranked_criteria", ranked_criteria)?,
        comparisons: decode_field::<Vec<Comparison>>("comparisons", comparisons)?,
        request_token: raw.request_token,
    })
}

fn decode_field<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| MalformedPayload(format!("{name}: {e}")))
}
