//! Error types for the rate upload pipeline.
//!
//! - [`CsvError`] - Dataset loading errors
//! - [`ConfigError`] - Credential and collection configuration errors
//! - [`UploadError`] - Outbound collection write errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP adapter errors
//!
//! Lookup misses and unparseable balances never show up here: they are
//! absorbed by the mapper as warnings and string fallbacks. A non-200
//! response from the collection API is not an error either, it is
//! [`crate::client::UploadOutcome::Failed`].

use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while loading the rate dataset.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Content could not be decoded.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A column the lookup depends on is absent (or entirely empty).
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while resolving the collection configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Credential variable not set.
    #[error("Missing {0} environment variable")]
    MissingApiKey(String),

    /// Collection id is not a number.
    #[error("Invalid collection id: {0}")]
    InvalidCollectionId(String),

    /// Timeout is not a whole number of seconds.
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors from the collection write itself.
///
/// These cover the cases where no HTTP status is available to report.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request could not be built or sent.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    InvalidResponse(String),

    /// The records could not be serialized.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::upload_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Upload error.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// No identifiers were supplied.
    #[error("No object_id values supplied")]
    NoKeys,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let config_err = ConfigError::MissingApiKey("CIO_API_KEY".into());
        let pipeline_err: PipelineError = config_err.into();
        assert!(pipeline_err.to_string().contains("CIO_API_KEY"));
    }

    #[test]
    fn test_missing_column_format() {
        let err = CsvError::MissingColumn("object_id".into());
        assert_eq!(err.to_string(), "Missing required column: object_id");
    }

    #[test]
    fn test_csv_error_conversion() {
        let data = "a,b\n1,2,3\n";
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(false)
            .from_reader(data.as_bytes());
        let err = rdr
            .records()
            .find_map(Result::err)
            .map(CsvError::from)
            .unwrap();
        assert!(matches!(err, CsvError::ParseError { .. }));
    }
}
