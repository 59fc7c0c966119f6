//! Domain models for the rate upload.
//!
//! - [`OutputRecord`] - One collection entry, serialized as-is into the request body
//! - [`LegalText`] - Deposit insurance disclaimer
//! - [`parse_requested_keys`] - Splits the user-supplied identifier list

use serde::{Deserialize, Serialize};

// =============================================================================
// Legal Text
// =============================================================================

/// Deposit insurance disclaimer shown next to a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegalText {
    /// Bank insured by the FDIC (row carries a `certno`).
    Fdic,
    /// Credit union insured by the NCUA (row carries an `ncuano`).
    Ncua,
    /// Neither identifier present.
    #[default]
    None,
}

impl LegalText {
    /// Pick the disclaimer from the two certificate columns.
    ///
    /// A value counts only if it is non-empty after trimming; `certno` wins
    /// when both are present.
    pub fn from_certificates(certno: Option<&str>, ncuano: Option<&str>) -> Self {
        let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());

        if present(certno) {
            Self::Fdic
        } else if present(ncuano) {
            Self::Ncua
        } else {
            Self::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fdic => "Member FDIC",
            Self::Ncua => "Insured by NCUA",
            Self::None => "",
        }
    }
}

// =============================================================================
// Output Record
// =============================================================================

/// A single entry of the rates collection.
///
/// Field names match the collection schema exactly; every value is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Position in the uploaded array, counted after skipped keys.
    pub id: String,
    pub rate_id: String,
    pub bank_name: String,
    pub bank_link: String,
    pub bank_logo_url: String,
    pub rate: String,
    /// `"<months> Month"`
    pub term: String,
    pub legal: String,
    /// `"$<amount> min deposit"`
    pub min_dep: String,
}

// =============================================================================
// Requested Keys
// =============================================================================

/// Split a comma-separated identifier list.
///
/// Each identifier is trimmed. Order and duplicates are kept; an empty
/// segment stays as an empty key (it will not match any row).
pub fn parse_requested_keys(input: &str) -> Vec<String> {
    input.split(',').map(|k| k.trim().to_string()).collect()
}
