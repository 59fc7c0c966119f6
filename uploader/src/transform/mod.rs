//! Transformation module.
//!
//! - Format: best-effort currency formatting
//! - Mapper: requested keys to collection records
//! - Pipeline: load, map and upload

pub mod format;
pub mod mapper;
pub mod pipeline;

pub use format::{coerce_whole, format_currency, format_min_deposit, group_thousands, Coerced};
pub use mapper::{map_row, map_rows, MapResult};
pub use pipeline::*;
