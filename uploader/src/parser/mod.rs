//! CSV loading with encoding auto-detection.
//!
//! Produces a [`Dataset`]: column names are trimmed and lowercased, empty
//! cells and null markers are absent, and columns with no value in any row
//! are dropped.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Column every lookup goes through.
pub const KEY_COLUMN: &str = "object_id";

/// Cell texts read as missing values, matched exactly (no trimming).
///
/// These are the markers spreadsheet and dataframe exports write for
/// empty numeric cells.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell counts as absent.
pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// One data row, keyed by normalized column name.
///
/// Only cells holding a value are stored, so a missing key, an empty
/// cell and a null marker like `N/A` all read the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Value of a column, `None` when the cell is empty or the column does not exist.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Value of a column, or `""` when absent.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }
}

/// In-memory rate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from a raw header line and raw rows.
    ///
    /// Cells matching [`NULL_TOKENS`] are treated as absent.
    /// Headers are normalized; when two headers normalize to the same name
    /// the first one wins. Rows shorter than the header get absent cells,
    /// extra trailing cells are ignored.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        // None marks a shadowed duplicate header
        let mut seen: Vec<String> = Vec::new();
        let slots: Vec<Option<String>> = headers
            .into_iter()
            .map(|h| {
                let name = normalize_column(h.as_ref());
                if seen.contains(&name) {
                    None
                } else {
                    seen.push(name.clone());
                    Some(name)
                }
            })
            .collect();

        let rows: Vec<Row> = rows
            .into_iter()
            .map(|raw| {
                let mut cells = BTreeMap::new();
                for (slot, value) in slots.iter().zip(raw) {
                    let value = value.as_ref();
                    if let (Some(name), false) = (slot, is_null_token(value)) {
                        cells.insert(name.clone(), value.to_string());
                    }
                }
                Row { cells }
            })
            .collect();

        let columns = seen
            .into_iter()
            .filter(|c| rows.iter().any(|r| r.get(c).is_some()))
            .collect();

        Self { columns, rows }
    }

    /// Surviving column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// First row whose `column` value equals `value` exactly.
    pub fn find_first(&self, column: &str, value: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.get(column) == Some(value))
    }
}

/// Trim surrounding whitespace (and a UTF-8 BOM) and lowercase.
pub fn normalize_column(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Result of loading with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Normalized table
    pub dataset: Dataset,
    /// Detected encoding
    pub encoding: String,
    /// Normalized headers dropped because every cell was empty
    pub dropped_columns: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => {
                let (text, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    return Err(CsvError::EncodingError(format!(
                        "invalid {} byte sequence",
                        enc.name()
                    )));
                }
                text.into_owned()
            }
            // Fallback: UTF-8 with lossy conversion
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    Ok(decoded)
}

/// Load a CSV file with encoding auto-detection.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes)
}

/// Load CSV bytes with encoding auto-detection.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    parse_str(&content, encoding)
}

/// Load already-decoded CSV text.
pub fn parse_str(content: &str, encoding: impl Into<String>) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_column).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let dataset = Dataset::from_rows(&headers, raw_rows);
    if !dataset.has_column(KEY_COLUMN) {
        return Err(CsvError::MissingColumn(KEY_COLUMN.to_string()));
    }

    let mut dropped_columns: Vec<String> = Vec::new();
    for h in headers {
        if !h.is_empty() && !dataset.has_column(&h) && !dropped_columns.contains(&h) {
            dropped_columns.push(h);
        }
    }

    Ok(ParseResult {
        dataset,
        encoding: encoding.into(),
        dropped_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(csv: &str) -> Dataset {
        parse_str(csv, "utf-8").unwrap().dataset
    }

    #[test]
    fn test_column_names_normalized() {
        let ds = load(" Object_ID ,BankName\nA1,Acme\n");
        assert_eq!(ds.columns(), ["object_id", "bankname"]);
        assert_eq!(ds.rows()[0].get("bankname"), Some("Acme"));
    }

    #[test]
    fn test_empty_columns_dropped() {
        let result = parse_str("object_id,notes,apy\nA1,,4.5\nB2,,3.9\n", "utf-8").unwrap();
        assert_eq!(result.dataset.columns(), ["object_id", "apy"]);
        assert_eq!(result.dropped_columns, vec!["notes"]);
    }

    #[test]
    fn test_empty_cells_are_absent() {
        let ds = load("object_id,certno,ncuano\nA1,,  \n");
        let row = &ds.rows()[0];
        assert_eq!(row.get("certno"), None);
        // whitespace-only survives as text
        assert_eq!(row.get("ncuano"), Some("  "));
        assert_eq!(row.text("certno"), "");
    }

    #[test]
    fn test_null_tokens_are_absent() {
        let ds = load("object_id,certno,ncuano,minbalance,notes\nCU1,N/A,68123,NA,null\n");
        let row = &ds.rows()[0];
        assert_eq!(row.get("certno"), None);
        assert_eq!(row.get("minbalance"), None);
        assert_eq!(row.get("ncuano"), Some("68123"));
        // a column holding only null markers is dropped
        assert_eq!(ds.columns(), ["object_id", "ncuano"]);
    }

    #[test]
    fn test_null_tokens_match_exactly() {
        assert!(is_null_token("NaN"));
        assert!(is_null_token("#N/A"));
        assert!(!is_null_token(" NA"));
        assert!(!is_null_token("na"));
        assert!(!is_null_token("none"));
    }

    #[test]
    fn test_quoted_values() {
        let ds = load("object_id,bankname\nA1,\"Acme, Bank\"\n");
        assert_eq!(ds.rows()[0].get("bankname"), Some("Acme, Bank"));
    }

    #[test]
    fn test_short_and_long_rows() {
        let ds = load("object_id,apy,term\nA1,4.5\nB2,3.9,12,extra\n");
        assert_eq!(ds.rows()[0].get("term"), None);
        assert_eq!(ds.rows()[1].get("term"), Some("12"));
    }

    #[test]
    fn test_values_not_trimmed() {
        let ds = load("object_id,apy\n A1 ,4.5\n");
        assert!(ds.find_first("object_id", "A1").is_none());
        assert!(ds.find_first("object_id", " A1 ").is_some());
    }

    #[test]
    fn test_find_first_match_wins() {
        let ds = load("object_id,bankname\nA1,First\nA1,Second\n");
        let row = ds.find_first("object_id", "A1").unwrap();
        assert_eq!(row.get("bankname"), Some("First"));
    }

    #[test]
    fn test_bom_stripped() {
        let ds = load("\u{feff}object_id,apy\nA1,4.5\n");
        assert!(ds.has_column("object_id"));
    }

    #[test]
    fn test_missing_key_column() {
        let err = parse_str("id,apy\nA1,4.5\n", "utf-8").unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == "object_id"));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", "utf-8"), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_str("  \n", "utf-8"), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let ds = load("object_id,APY,apy \nA1,4.5,9.9\n");
        assert_eq!(ds.columns(), ["object_id", "apy"]);
        assert_eq!(ds.rows()[0].get("apy"), Some("4.5"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "object_id,bankname,apy").unwrap();
        writeln!(file, "A1,Acme Bank,4.5").unwrap();
        file.flush().unwrap();

        let result = parse_csv_file(file.path()).unwrap();
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.dataset.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_csv_file("/nonexistent/rates.csv").unwrap_err();
        assert!(matches!(err, CsvError::IoError(_)));
    }
}
