//! Facility table I/O.
//!
//! Expected columns: `lat`/`latitude` and `lon`/`longitude` (required),
//! `name`, `category`, and `type` (optional). An explicit `category` wins;
//! otherwise the category is derived from the free-text `type`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use care_access_facility_models::{Facility, FacilityCategory};
use serde::Serialize;

use crate::{IngestError, Loaded, ValidationIssue, cell, find_column, parse_coordinate};

const TABLE: &str = "facility";

/// Reads the facility table at `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or read, or if a
/// coordinate column is missing.
pub fn load_facilities(path: &Path) -> Result<Loaded<Facility>, IngestError> {
    let loaded = read_facilities(File::open(path)?)?;
    loaded.log_summary(TABLE);
    Ok(loaded)
}

/// Reads a facility table from any CSV source.
///
/// Rows with a missing or invalid coordinate are skipped and reported as
/// [`ValidationIssue`]s.
///
/// # Errors
///
/// Returns [`IngestError`] on CSV syntax errors or if a coordinate column
/// is missing.
pub fn read_facilities(reader: impl Read) -> Result<Loaded<Facility>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let lat_idx = find_column(&headers, &["lat", "latitude"]).ok_or(IngestError::MissingColumn {
        table: TABLE,
        column: "lat",
    })?;
    let lon_idx = find_column(&headers, &["lon", "longitude"]).ok_or(IngestError::MissingColumn {
        table: TABLE,
        column: "lon",
    })?;
    let name_idx = find_column(&headers, &["name"]);
    let category_idx = find_column(&headers, &["category"]);
    let type_idx = find_column(&headers, &["type"]);

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let lat = parse_coordinate(cell(&record, Some(lat_idx)));
        let lon = parse_coordinate(cell(&record, Some(lon_idx)));
        let (lat, lon) = match (lat, lon) {
            (Ok(Some(lat)), Ok(Some(lon))) => (lat, lon),
            (lat, lon) => {
                for (field, parsed) in [("lat", lat), ("lon", lon)] {
                    match parsed {
                        Ok(Some(_)) => {}
                        Ok(None) => issues.push(ValidationIssue::new(row, field, "missing")),
                        Err(e) => issues.push(ValidationIssue::new(row, field, e)),
                    }
                }
                continue;
            }
        };

        let category = match cell(&record, category_idx) {
            Some(raw) => raw
                .parse()
                .unwrap_or_else(|_| FacilityCategory::from_facility_type(Some(raw))),
            None => FacilityCategory::from_facility_type(cell(&record, type_idx)),
        };

        records.push(Facility {
            name: cell(&record, name_idx).map(str::to_string),
            category,
            lat,
            lon,
        });
    }

    Ok(Loaded { records, issues })
}

#[derive(Serialize)]
struct FacilityRow<'a> {
    name: Option<&'a str>,
    category: FacilityCategory,
    lat: f64,
    lon: f64,
}

/// Writes facilities as CSV (`name,category,lat,lon`).
///
/// # Errors
///
/// Returns [`IngestError`] if serialization or the write fails.
pub fn write_facilities(writer: impl Write, facilities: &[Facility]) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for facility in facilities {
        wtr.serialize(FacilityRow {
            name: facility.name.as_deref(),
            category: facility.category,
            lat: facility.lat,
            lon: facility.lon,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
