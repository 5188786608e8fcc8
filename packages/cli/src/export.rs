//! Writes a metrics run to disk as JSON, CSV, and `GeoJSON`.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use care_access_analytics_models::{AccessMetrics, Gap, MetricOutcome, MetricsDocument};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use thiserror::Error;

pub const METRICS_FILE: &str = "access_metrics.json";
pub const DISTANCES_FILE: &str = "distances.csv";
pub const GAPS_FILE: &str = "gaps.csv";
pub const SCORES_FILE: &str = "scores.csv";
pub const GAPS_GEOJSON_FILE: &str = "gaps.geojson";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("JSON error writing {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
struct DistanceRow<'a> {
    geoid: &'a str,
    distance_km: Option<f64>,
}

#[derive(Serialize)]
struct GapRow<'a> {
    geoid: &'a str,
    distance_km: f64,
    population: Option<u64>,
}

#[derive(Serialize)]
struct ScoreRow<'a> {
    geoid: &'a str,
    access_score: f64,
}

/// Writes every export file for `metrics` into `dir`, creating it if
/// needed. Per-area files are skipped for metrics that are unavailable, and
/// any copy left in `dir` by an earlier run is removed.
///
/// Returns the paths written, in write order.
///
/// # Errors
///
/// Returns [`ExportError`] if any file cannot be written.
pub fn export_all(metrics: &AccessMetrics, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();

    let path = dir.join(METRICS_FILE);
    write_metrics_json(&MetricsDocument::now(metrics.clone()), &path)?;
    written.push(path);

    if let MetricOutcome::Available { value } = &metrics.distances {
        let path = dir.join(DISTANCES_FILE);
        write_csv(
            &path,
            &["geoid", "distance_km"],
            value.iter().map(|d| DistanceRow {
                geoid: &d.geoid,
                distance_km: d.distance_km,
            }),
        )?;
        written.push(path);
    } else {
        remove_stale(&dir.join(DISTANCES_FILE))?;
    }

    if let MetricOutcome::Available { value: gaps } = &metrics.gaps {
        let path = dir.join(GAPS_FILE);
        write_csv(
            &path,
            &["geoid", "distance_km", "population"],
            gaps.iter().map(|g| GapRow {
                geoid: &g.area.geoid,
                distance_km: g.distance_km,
                population: g.area.population,
            }),
        )?;
        written.push(path);

        let path = dir.join(GAPS_GEOJSON_FILE);
        write_gaps_geojson(gaps, &path)?;
        written.push(path);
    } else {
        remove_stale(&dir.join(GAPS_FILE))?;
        remove_stale(&dir.join(GAPS_GEOJSON_FILE))?;
    }

    if let MetricOutcome::Available { value } = &metrics.scores {
        let path = dir.join(SCORES_FILE);
        write_csv(
            &path,
            &["geoid", "access_score"],
            value.scores.iter().map(|s| ScoreRow {
                geoid: &s.geoid,
                access_score: s.score,
            }),
        )?;
        written.push(path);
    } else {
        remove_stale(&dir.join(SCORES_FILE))?;
    }

    for path in &written {
        log::info!("Wrote {}", path.display());
    }

    Ok(written)
}

fn remove_stale(path: &Path) -> Result<(), ExportError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::info!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ExportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_metrics_json(document: &MetricsDocument, path: &Path) -> Result<(), ExportError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, document).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `header` followed by one serialized record per row, so an empty
/// metric still produces a header-only file.
fn write_csv<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create(path)?);

    wtr.write_record(header).map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds a `FeatureCollection` of gap centroids with the gap's distance
/// and population as properties.
fn gaps_feature_collection(gaps: &[Gap]) -> FeatureCollection {
    let features = gaps
        .iter()
        .filter_map(|gap| {
            let centroid = gap.area.centroid?;

            let mut properties = JsonObject::new();
            properties.insert("geoid".to_string(), gap.area.geoid.clone().into());
            properties.insert("distance_km".to_string(), gap.distance_km.into());
            properties.insert(
                "population".to_string(),
                gap.area
                    .population
                    .map_or(serde_json::Value::Null, Into::into),
            );

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    centroid.lon,
                    centroid.lat,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn write_gaps_geojson(gaps: &[Gap], path: &Path) -> Result<(), ExportError> {
    let mut writer = create(path)?;
    serde_json::to_writer(&mut writer, &gaps_feature_collection(gaps)).map_err(|source| {
        ExportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
