//! Row lookup and field mapping.
//!
//! Turns the requested identifiers into collection records, one per key
//! found in the dataset, in request order.
//!
//! | Record field    | Source column    | Rule                               |
//! |-----------------|------------------|------------------------------------|
//! | `rate_id`       | (requested key)  | as requested                       |
//! | `bank_name`     | `bankname`       | pass-through                       |
//! | `bank_link`     | `bankdetailsurl` | pass-through                       |
//! | `bank_logo_url` | `banklogo`       | pass-through                       |
//! | `rate`          | `apy`            | pass-through                       |
//! | `term`          | `terminmonths`   | `"<value> Month"`                  |
//! | `legal`         | `certno`/`ncuano`| see [`LegalText::from_certificates`] |
//! | `min_dep`       | `minbalance`     | see [`format_min_deposit`]         |

use serde::Serialize;

use super::format::format_min_deposit;
use crate::models::{LegalText, OutputRecord};
use crate::parser::{Dataset, Row, KEY_COLUMN};

/// Records and lookup warnings for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapResult {
    /// Mapped records, in request order
    pub records: Vec<OutputRecord>,
    /// One message per key that matched no row
    pub warnings: Vec<String>,
}

impl MapResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Mapped: {} records, {} not found",
            self.records.len(),
            self.warnings.len()
        )
    }
}

/// Map each requested key to a record.
///
/// The first row whose `object_id` equals the key is used. Keys with no
/// matching row produce a warning and do not take up an `id`. Never fails.
pub fn map_rows<S: AsRef<str>>(dataset: &Dataset, keys: &[S]) -> MapResult {
    let mut result = MapResult::default();

    for key in keys {
        let key = key.as_ref();
        match dataset.find_first(KEY_COLUMN, key) {
            Some(row) => {
                let index = result.records.len();
                result.records.push(map_row(row, key, index));
            }
            None => result.warnings.push(not_found_message(key)),
        }
    }

    result
}

/// Map a single matched row.
pub fn map_row(row: &Row, key: &str, index: usize) -> OutputRecord {
    let legal = LegalText::from_certificates(row.get("certno"), row.get("ncuano"));

    OutputRecord {
        id: index.to_string(),
        rate_id: key.to_string(),
        bank_name: row.text("bankname").to_string(),
        bank_link: row.text("bankdetailsurl").to_string(),
        bank_logo_url: row.text("banklogo").to_string(),
        rate: row.text("apy").to_string(),
        term: format!("{} Month", row.text("terminmonths")),
        legal: legal.as_str().to_string(),
        min_dep: format_min_deposit(row.text("minbalance")),
    }
}

fn not_found_message(key: &str) -> String {
    format!("object_id {} not found.", key)
}
