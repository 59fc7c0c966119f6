//! Collection content client.
//!
//! Writes the mapped records to the collection in a single authenticated
//! PUT. The remote replaces the whole collection content; there is no retry.
//!
//! ```rust,ignore
//! use rate_uploader::{CollectionClient, CollectionConfig, UploadOutcome};
//!
//! let client = CollectionClient::new(CollectionConfig::from_env()?)?;
//! match client.replace_content(&records).await? {
//!     UploadOutcome::Success => println!("updated"),
//!     UploadOutcome::Failed { status, body } => eprintln!("{}: {}", status, body),
//! }
//! ```

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;

use crate::config::CollectionConfig;
use crate::error::{UploadError, UploadResult};
use crate::models::OutputRecord;

/// Terminal state of a collection write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum UploadOutcome {
    /// The remote answered 200.
    Success,
    /// Any other status, with the raw response body.
    Failed { status: u16, body: String },
}

impl UploadOutcome {
    /// Interpret a response status and body. Only 200 counts as success.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        if status == StatusCode::OK {
            Self::Success
        } else {
            Self::Failed {
                status: status.as_u16(),
                body,
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// HTTP client for the collection content endpoint.
#[derive(Debug, Clone)]
pub struct CollectionClient {
    http: reqwest::Client,
    config: CollectionConfig,
}

impl CollectionClient {
    /// Build a client from a resolved config.
    pub fn new(config: CollectionConfig) -> UploadResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Replace the collection content with `records`.
    ///
    /// Returns `Err` only when no status is available (connection failure,
    /// timeout, unreadable body). A non-200 status is an
    /// [`UploadOutcome::Failed`].
    pub async fn replace_content(&self, records: &[OutputRecord]) -> UploadResult<UploadOutcome> {
        let body = serde_json::to_string(records)?;

        let response = self
            .http
            .put(self.config.content_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key()))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        Ok(UploadOutcome::from_response(status, text))
    }
}
