//! High-level upload pipeline.
//!
//! Load → map → write, in sequence, logging each step:
//!
//! ```rust,ignore
//! use rate_uploader::{upload_file, CollectionClient, CollectionConfig};
//! use std::path::Path;
//!
//! let client = CollectionClient::new(CollectionConfig::from_env()?)?;
//! let report = upload_file(Path::new("rates.csv"), "A1,B2", &client).await?;
//! println!("{} records, success: {}", report.records.len(), report.outcome.is_success());
//! ```

use serde::Serialize;
use std::path::Path;

use super::mapper::{map_rows, MapResult};
use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::client::{CollectionClient, UploadOutcome};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{parse_requested_keys, OutputRecord};
use crate::parser::{parse_bytes, parse_csv_file, Dataset, ParseResult};

/// Result of a completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    /// Records that were sent
    pub records: Vec<OutputRecord>,
    /// Lookup warnings
    pub warnings: Vec<String>,
    /// How the remote answered
    pub outcome: UploadOutcome,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Map the requested identifiers against a dataset without sending anything.
///
/// `ids` is the raw comma-separated list. A blank list is rejected;
/// unmatched identifiers are logged and skipped.
pub fn prepare(dataset: &Dataset, ids: &str) -> PipelineResult<MapResult> {
    if ids.trim().is_empty() {
        return Err(PipelineError::NoKeys);
    }

    let keys = parse_requested_keys(ids);
    log_info(format!("🔎 Looking up {} object_id value(s)...", keys.len()));

    let result = map_rows(dataset, &keys);
    for warning in &result.warnings {
        log_warning(warning.as_str());
    }
    log_success(result.summary());

    Ok(result)
}

/// Map and upload against an already loaded dataset.
pub async fn upload_dataset(
    dataset: &Dataset,
    ids: &str,
    client: &CollectionClient,
) -> PipelineResult<UploadReport> {
    let mapped = prepare(dataset, ids)?;

    if mapped.is_empty() {
        log_warning("No rows matched; the collection will be replaced with an empty list");
    }

    log_info(format!(
        "📡 Uploading {} record(s) to collection {}...",
        mapped.records.len(),
        client.config().collection_id
    ));

    let outcome = match client.replace_content(&mapped.records).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log_error(format!("Upload failed: {}", e));
            return Err(e.into());
        }
    };

    match &outcome {
        UploadOutcome::Success => log_success("Rates collection successfully updated!"),
        UploadOutcome::Failed { status, body } => {
            log_error(format!("Failed to update collection. Status: {}", status));
            log_error(body.as_str());
        }
    }

    Ok(UploadReport {
        records: mapped.records,
        warnings: mapped.warnings,
        outcome,
    })
}

/// Load a CSV file, map and upload.
pub async fn upload_file(
    path: &Path,
    ids: &str,
    client: &CollectionClient,
) -> PipelineResult<UploadReport> {
    log_info(format!("📖 Reading {}", path.display()));
    let parsed = parse_csv_file(path)?;
    log_parse_result(&parsed);
    upload_dataset(&parsed.dataset, ids, client).await
}

/// Load CSV bytes, map and upload.
pub async fn upload_bytes(
    bytes: &[u8],
    ids: &str,
    client: &CollectionClient,
) -> PipelineResult<UploadReport> {
    log_info(format!("📖 Reading upload ({} bytes)", bytes.len()));
    let parsed = parse_bytes(bytes)?;
    log_parse_result(&parsed);
    upload_dataset(&parsed.dataset, ids, client).await
}

fn log_parse_result(parsed: &ParseResult) {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.dataset.len(),
        parsed.dataset.columns().len()
    ));
    if !parsed.dropped_columns.is_empty() {
        log_info(format!(
            "Dropped empty columns: {}",
            parsed.dropped_columns.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::spawn_remote;
    use crate::config::CollectionConfig;
    use crate::parser::parse_str;

    const CSV: &str = "Object_ID , BankName,APY,TermInMonths,CertNo,NCUANo,MinBalance,Notes\n\
                       A1,Acme Bank,4.5,12,123,,1000,\n\
                       C3,Credit Union Co,3.9,6,,4567,250.50,\n";

    fn client_for(url: &str) -> CollectionClient {
        CollectionClient::new(CollectionConfig::new("token").with_api_url(url)).unwrap()
    }

    #[test]
    fn test_prepare_rejects_blank_ids() {
        let ds = parse_str(CSV, "utf-8").unwrap().dataset;
        assert!(matches!(prepare(&ds, "   "), Err(PipelineError::NoKeys)));
    }

    #[test]
    fn test_prepare_maps_and_warns() {
        let ds = parse_str(CSV, "utf-8").unwrap().dataset;
        let result = prepare(&ds, "C3, B2 ,A1").unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].rate_id, "C3");
        assert_eq!(result.records[0].legal, "Insured by NCUA");
        assert_eq!(result.records[0].min_dep, "$250 min deposit");
        assert_eq!(result.records[1].id, "1");
        assert_eq!(result.warnings, vec!["object_id B2 not found."]);
    }

    #[tokio::test]
    async fn test_upload_bytes_success() {
        let (url, captured) = spawn_remote(200, "ok").await;
        let report = upload_bytes(CSV.as_bytes(), "A1,B2", &client_for(&url))
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.warnings, vec!["object_id B2 not found."]);

        let body = captured.lock().unwrap().body.clone().unwrap();
        let sent: Vec<OutputRecord> = serde_json::from_str(&body).unwrap();
        assert_eq!(sent, report.records);
        assert_eq!(sent[0].term, "12 Month");
        assert_eq!(sent[0].legal, "Member FDIC");
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported() {
        let (url, _) = spawn_remote(403, "forbidden").await;
        let report = upload_bytes(CSV.as_bytes(), "A1", &client_for(&url))
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(
            report.outcome,
            UploadOutcome::Failed {
                status: 403,
                body: "forbidden".into()
            }
        );
    }

    #[tokio::test]
    async fn test_upload_file() {
        use std::io::Write;

        let (url, _) = spawn_remote(200, "").await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        file.flush().unwrap();

        let report = upload_file(file.path(), "A1,C3", &client_for(&url))
            .await
            .unwrap();
        assert_eq!(report.records.len(), 2);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_csv_error_stops_before_upload() {
        let (url, captured) = spawn_remote(200, "").await;
        let err = upload_bytes(b"id,apy\nA1,4.5\n", "A1", &client_for(&url))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Csv(_)));
        assert!(captured.lock().unwrap().body.is_none());
    }
}
