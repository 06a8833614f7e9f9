//! # Supabase
//!
//! Both the `submissions` table (PostgREST) and the private `pdf-storage` bucket (storage API)
//! live in one Supabase project, reached with the service role key.
//!
//! ## Schema
//! ```sql
//! create table submissions (
//!     id bigint generated always as identity primary key,
//!     ranked_criteria jsonb not null,
//!     comparisons jsonb not null,
//!     created_at timestamptz not null,
//!     request_token uuid unique
//! );
//! ```
//!
//! The bucket is created private. Uploads are sent with `x-upsert: false`, so an existing
//! object is never overwritten.
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

pub struct Supabase {
    http: Client,
    url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
    error: Option<String>,
}

impl Supabase {
    pub fn new(url: &str, service_key: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().build()?,
            url: url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{path}", self.url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// Best description of a failed call: the API's own message, else the status line.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                format!("{status}: {}", body.trim())
            }
        })
}
