#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and validation of the facility and area tables.
//!
//! Both tables arrive as CSV with loosely-typed columns. Rows are turned
//! into explicit records here; bad values in a row become
//! [`ValidationIssue`]s instead of failing the load, so one malformed row
//! only affects the metrics that needed it. A table that lacks a required
//! column fails as a whole.

pub mod areas;
pub mod clean;
pub mod facilities;

use csv::StringRecord;
use serde::Serialize;
use thiserror::Error;

pub use areas::{load_areas, read_areas};
pub use clean::{CleanReport, clean_facilities};
pub use facilities::{load_facilities, read_facilities, write_facilities};

/// Errors that abort loading a whole table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn {
        /// Table being loaded.
        table: &'static str,
        /// Column that was expected.
        column: &'static str,
    },
}

/// A row-level problem found while loading a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    /// Column the problem was found in.
    pub field: String,
    /// Description of the problem.
    pub message: String,
}

impl ValidationIssue {
    fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} ({}): {}", self.row, self.field, self.message)
    }
}

/// Records parsed from a table plus the problems found along the way.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    /// Records that survived validation, in file order.
    pub records: Vec<T>,
    /// Row-level problems.
    pub issues: Vec<ValidationIssue>,
}

impl<T> Loaded<T> {
    /// Logs a one-line summary plus each issue at `warn`.
    pub fn log_summary(&self, table: &str) {
        log::info!("Loaded {} {table} rows", self.records.len());
        if !self.issues.is_empty() {
            log::warn!("{} {table} row issue(s)", self.issues.len());
            for issue in &self.issues {
                log::warn!("  {table} {issue}");
            }
        }
    }
}

/// Finds the first header matching any of `names`.
fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

/// Returns the trimmed cell value, or `None` when blank or absent.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses a coordinate cell. Blank cells are `Ok(None)`.
fn parse_coordinate(raw: Option<&str>) -> Result<Option<f64>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(format!("'{raw}' is not a finite coordinate"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_parsing() {
        assert_eq!(parse_coordinate(None), Ok(None));
        assert_eq!(parse_coordinate(Some("34.05")), Ok(Some(34.05)));
        assert!(parse_coordinate(Some("north")).is_err());
        assert!(parse_coordinate(Some("NaN")).is_err());
        assert!(parse_coordinate(Some("inf")).is_err());
    }

    #[test]
    fn column_aliases() {
        let headers = StringRecord::from(vec!["name", "latitude", "lon"]);
        assert_eq!(find_column(&headers, &["lat", "latitude"]), Some(1));
        assert_eq!(find_column(&headers, &["lon", "longitude"]), Some(2));
        assert_eq!(find_column(&headers, &["category"]), None);
    }
}
