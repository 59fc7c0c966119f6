//! # Rate Uploader - CD/savings rates to a content collection
//!
//! Reads a rates CSV, picks the rows for a list of `object_id` values,
//! maps them into the collection schema and replaces the collection
//! content with one authenticated PUT.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Rates CSV  │────▶│   Parser    │────▶│   Mapper    │────▶│ PUT content │
//! │  (ISO/UTF8) │     │ (normalize) │     │ (by key)    │     │ (200 = ok)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rate_uploader::{upload_file, CollectionClient, CollectionConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = CollectionClient::new(CollectionConfig::from_env().unwrap()).unwrap();
//!     let report = upload_file(Path::new("rates.csv"), "A1,B2", &client).await.unwrap();
//!     println!("Uploaded {} records", report.records.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Collection configuration
//! - [`models`] - Output record and legal text
//! - [`parser`] - CSV loading with encoding detection
//! - [`transform`] - Mapping and the upload pipeline
//! - [`client`] - Collection content client
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Remote collection
pub mod client;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, CsvError, PipelineError, ServerError, UploadError};

pub use config::CollectionConfig;

pub use models::{parse_requested_keys, LegalText, OutputRecord};

pub use parser::{
    decode_content, detect_encoding, parse_bytes, parse_csv_file, parse_str, Dataset,
    ParseResult, Row,
};

pub use transform::{
    format_min_deposit, map_rows, prepare, upload_bytes, upload_dataset, upload_file, Coerced,
    MapResult, UploadReport,
};

pub use client::{CollectionClient, UploadOutcome};

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
