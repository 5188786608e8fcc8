//! Area (census tract) table loading.
//!
//! Expected columns: `geoid` (or `GEOID`/`id`), `centroid_lat`,
//! `centroid_lon`, and `population` (or `Total Population`). Every other
//! column is carried through as a string attribute.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use care_access_geography_models::{Area, Centroid};

use crate::{IngestError, Loaded, ValidationIssue, cell, find_column, parse_coordinate};

const TABLE: &str = "area";
const ID_COLUMNS: &[&str] = &["geoid", "GEOID", "id"];
const POPULATION_COLUMNS: &[&str] = &["population", "Total Population"];
const CENTROID_LAT_COLUMNS: &[&str] = &["centroid_lat"];
const CENTROID_LON_COLUMNS: &[&str] = &["centroid_lon"];

/// Reads the area table at `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or read, or if the
/// id column is missing.
pub fn load_areas(path: &Path) -> Result<Loaded<Area>, IngestError> {
    let loaded = read_areas(File::open(path)?)?;
    loaded.log_summary(TABLE);
    Ok(loaded)
}

/// Reads an area table from any CSV source.
///
/// Rows with an empty or duplicate id are skipped. An absent or invalid
/// centroid leaves the area without one; an absent or invalid population
/// leaves it `None`. Invalid values are reported as [`ValidationIssue`]s,
/// blank centroids are not.
///
/// # Errors
///
/// Returns [`IngestError`] on CSV syntax errors or if the id column is
/// missing.
pub fn read_areas(reader: impl Read) -> Result<Loaded<Area>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let id_idx = find_column(&headers, ID_COLUMNS).ok_or(IngestError::MissingColumn {
        table: TABLE,
        column: "geoid",
    })?;
    let population_idx = find_column(&headers, POPULATION_COLUMNS);
    let lat_idx = find_column(&headers, CENTROID_LAT_COLUMNS);
    let lon_idx = find_column(&headers, CENTROID_LON_COLUMNS);

    let mut issues = Vec::new();
    if population_idx.is_none() {
        issues.push(ValidationIssue::new(0, "population", "column is missing"));
    }
    if lat_idx.is_none() || lon_idx.is_none() {
        log::warn!("Area table has no centroid columns; every distance will be undefined");
    }

    let known: BTreeSet<usize> = [Some(id_idx), population_idx, lat_idx, lon_idx]
        .into_iter()
        .flatten()
        .collect();

    let mut records = Vec::new();
    let mut seen = BTreeSet::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let Some(geoid) = cell(&record, Some(id_idx)) else {
            issues.push(ValidationIssue::new(row, "geoid", "missing"));
            continue;
        };
        if !seen.insert(geoid.to_string()) {
            issues.push(ValidationIssue::new(
                row,
                "geoid",
                format!("duplicate id '{geoid}'; keeping the first row"),
            ));
            continue;
        }

        let centroid = parse_centroid(
            cell(&record, lat_idx),
            cell(&record, lon_idx),
            row,
            &mut issues,
        );

        let population = population_idx.and_then(|idx| {
            let raw = cell(&record, Some(idx));
            parse_population(raw)
                .map_err(|e| issues.push(ValidationIssue::new(row, "population", e)))
                .ok()
        });

        let attributes: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !known.contains(idx))
            .filter_map(|(idx, name)| {
                record
                    .get(idx)
                    .map(|value| (name.to_string(), value.trim().to_string()))
            })
            .collect();

        records.push(Area {
            geoid: geoid.to_string(),
            centroid,
            population,
            attributes,
        });
    }

    Ok(Loaded { records, issues })
}

fn parse_centroid(
    lat: Option<&str>,
    lon: Option<&str>,
    row: usize,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Centroid> {
    match (parse_coordinate(lat), parse_coordinate(lon)) {
        (Ok(Some(lat)), Ok(Some(lon))) => Some(Centroid::new(lat, lon)),
        (Ok(None), Ok(None)) => None,
        (lat, lon) => {
            for (field, parsed) in [("centroid_lat", lat), ("centroid_lon", lon)] {
                match parsed {
                    Ok(Some(_)) => {}
                    Ok(None) => issues.push(ValidationIssue::new(
                        row,
                        field,
                        "missing while the other coordinate is present",
                    )),
                    Err(e) => issues.push(ValidationIssue::new(row, field, e)),
                }
            }
            None
        }
    }
}

/// 2^64, the first float above every `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Parses a population cell. Integral floats (`"1234.0"`) are accepted.
fn parse_population(raw: Option<&str>) -> Result<u64, String> {
    let raw = raw.ok_or_else(|| "missing".to_string())?;

    if let Ok(value) = raw.parse::<i64>() {
        return u64::try_from(value).map_err(|_| format!("negative population {value}"));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            if value < 0.0 {
                Err(format!("negative population {value}"))
            } else if value >= U64_LIMIT {
                Err(format!("population {value} is too large"))
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(value as u64)
            }
        }
        _ => Err(format!("'{raw}' is not a whole number")),
    }
}
