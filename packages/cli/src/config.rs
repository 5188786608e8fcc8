//! `care_access.toml` configuration.
//!
//! Every field is optional in the file; command-line flags override
//! whatever the file sets.

use std::path::{Path, PathBuf};

use care_access_analytics_models::{DEFAULT_THRESHOLD_KM, MetricsOptions};
use care_access_facility_models::FacilityCategory;
use care_access_geography_models::BoundingBox;
use serde::Deserialize;
use thiserror::Error;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "care_access.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid threshold {0} km: must be a finite, non-negative number")]
    InvalidThreshold(f64),
}

/// Resolved settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Facility CSV.
    pub facilities: PathBuf,
    /// Area CSV.
    pub areas: PathBuf,
    /// Directory `export` writes into.
    pub output_dir: PathBuf,
    /// Gap threshold in kilometers.
    pub threshold_km: f64,
    /// Restrict metrics to one facility category.
    pub category: Option<FacilityCategory>,
    /// Region used by `clean` to drop out-of-area facilities.
    pub bounds: Option<BoundingBox>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            facilities: PathBuf::from("data/processed/facilities_cleaned.csv"),
            areas: PathBuf::from("data/processed/census_merged.csv"),
            output_dir: PathBuf::from("outputs/reports"),
            threshold_km: DEFAULT_THRESHOLD_KM,
            category: None,
            bounds: None,
        }
    }
}

impl AccessConfig {
    /// Loads the config file.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is used if present and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Builds the metric options, rejecting unusable thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] for a negative or
    /// non-finite threshold.
    pub fn metrics_options(&self) -> Result<MetricsOptions, ConfigError> {
        if !self.threshold_km.is_finite() || self.threshold_km < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold_km));
        }
        Ok(MetricsOptions {
            threshold_km: self.threshold_km,
            category: self.category,
        })
    }
}
