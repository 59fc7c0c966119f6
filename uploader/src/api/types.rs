//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::client::UploadOutcome;
use crate::models::OutputRecord;
use crate::transform::pipeline::UploadReport;

/// Response sent after an upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// "success" or "failed"
    pub status: String,

    /// Number of records sent to the collection
    pub record_count: usize,

    /// Records as sent
    pub records: Vec<OutputRecord>,

    /// object_id values that matched no row
    pub warnings: Vec<String>,

    /// HTTP status returned by the collection API
    pub remote_status: u16,

    /// Raw response body, on failure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_body: Option<String>,
}

impl From<UploadReport> for UploadResponse {
    fn from(report: UploadReport) -> Self {
        let (status, remote_status, remote_body) = match report.outcome {
            UploadOutcome::Success => ("success", 200, None),
            UploadOutcome::Failed { status, body } => ("failed", status, Some(body)),
        };

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            record_count: report.records.len(),
            records: report.records,
            warnings: report.warnings,
            remote_status,
            remote_body,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "recordCount": 0,
        "records": [],
        "warnings": []
    })
}
