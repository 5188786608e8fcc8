#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Access metric result types.
//!
//! These are the values the analytics engine hands back to its callers:
//! per-area nearest-facility distances, the ordered list of access gaps,
//! the aggregate per-capita ratio, and normalized access scores. Each
//! metric is wrapped in a [`MetricOutcome`] so a failure in one metric
//! never hides the results of the others.

use care_access_facility_models::FacilityCategory;
use care_access_geography_models::Area;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default access-desert threshold in kilometers.
pub const DEFAULT_THRESHOLD_KM: f64 = 5.0;

/// Options controlling a metrics run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOptions {
    /// Areas farther than this from any facility are gaps.
    pub threshold_km: f64,
    /// Restrict the facility set to one category.
    pub category: Option<FacilityCategory>,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            threshold_km: DEFAULT_THRESHOLD_KM,
            category: None,
        }
    }
}

/// Nearest-facility distance for a single area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDistance {
    /// Area GEOID.
    pub geoid: String,
    /// Distance in kilometers, or `None` when the area has no centroid.
    /// Never zero-filled.
    pub distance_km: Option<f64>,
}

/// Nearest-facility distances for every input area, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceResult {
    entries: Vec<AreaDistance>,
}

impl DistanceResult {
    /// Wraps an ordered list of per-area distances.
    #[must_use]
    pub const fn new(entries: Vec<AreaDistance>) -> Self {
        Self { entries }
    }

    /// All entries in input order.
    #[must_use]
    pub fn entries(&self) -> &[AreaDistance] {
        &self.entries
    }

    /// Iterates entries in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, AreaDistance> {
        self.entries.iter()
    }

    /// Number of entries (equal to the number of input areas).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the distance for an area. The outer `Option` is `None` for
    /// unknown GEOIDs; the inner one is `None` for undefined distances.
    #[must_use]
    pub fn get(&self, geoid: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|e| e.geoid == geoid)
            .map(|e| e.distance_km)
    }

    /// Iterates the defined distances in input order, skipping undefined
    /// entries.
    pub fn defined(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|e| e.distance_km.map(|d| (e.geoid.as_str(), d)))
    }
}

impl<'a> IntoIterator for &'a DistanceResult {
    type Item = &'a AreaDistance;
    type IntoIter = std::slice::Iter<'a, AreaDistance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// An area whose nearest facility is farther than the gap threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    /// The underserved area.
    pub area: Area,
    /// Distance to the nearest facility in kilometers.
    pub distance_km: f64,
}

/// Aggregate facility-to-population ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerCapitaSummary {
    /// Number of facilities counted.
    pub total_facilities: u64,
    /// Total resident population.
    pub total_population: u64,
    /// Facilities per 10,000 residents.
    pub per_10k: f64,
    /// Facilities per 100,000 residents.
    pub per_100k: f64,
}

/// Composite access score for a single area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaScore {
    /// Area GEOID.
    pub geoid: String,
    /// Score in `[0, 100]`; higher means better access.
    pub score: f64,
}

/// Composite access scores for every area with a defined distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessScores {
    /// Scores in input order.
    pub scores: Vec<AreaScore>,
    /// Largest defined distance in the batch.
    pub max_distance_km: Option<f64>,
    /// Smallest defined distance in the batch.
    pub min_distance_km: Option<f64>,
    /// Whether the batch had no distance spread (`max == min`), in which
    /// case the documented degenerate policy produced the scores.
    pub degenerate: bool,
}

impl AccessScores {
    /// Looks up the score for an area.
    #[must_use]
    pub fn get(&self, geoid: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.geoid == geoid)
            .map(|s| s.score)
    }
}

/// Summary statistics over the defined distances of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceStats {
    /// Number of areas with a defined distance.
    pub defined: usize,
    /// Number of areas without a centroid.
    pub undefined: usize,
    /// Mean distance in kilometers.
    pub mean_km: Option<f64>,
    /// Median distance in kilometers.
    pub median_km: Option<f64>,
    /// Smallest distance in kilometers.
    pub min_km: Option<f64>,
    /// Largest distance in kilometers.
    pub max_km: Option<f64>,
}

/// Size of the access-gap problem at a given threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapSummary {
    /// Threshold the gaps were classified against.
    pub threshold_km: f64,
    /// Number of gap areas.
    pub count: usize,
    /// Residents living in gap areas (known populations only).
    pub affected_population: u64,
    /// Gap areas whose population is unknown.
    pub unknown_population: usize,
}

/// Result of one metric: either computed, or unavailable with a reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MetricOutcome<T> {
    /// The metric was computed.
    Available {
        /// Computed value.
        value: T,
    },
    /// The metric could not be computed for this run.
    Unavailable {
        /// Why the metric is missing.
        reason: String,
    },
}

impl<T> MetricOutcome<T> {
    /// Wraps a computed value.
    pub const fn available(value: T) -> Self {
        Self::Available { value }
    }

    /// Marks the metric unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns the value if the metric was computed.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Available { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns `true` if the metric was computed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Maps an available value, keeping the reason otherwise.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricOutcome<U> {
        match self {
            Self::Available { value } => MetricOutcome::Available { value: f(value) },
            Self::Unavailable { reason } => MetricOutcome::Unavailable { reason },
        }
    }
}

/// Names of the metrics a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    /// Nearest-facility distances.
    Distances,
    /// Access gaps.
    Gaps,
    /// Facilities per capita.
    PerCapita,
    /// Composite access scores.
    Scores,
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distances => write!(f, "distances"),
            Self::Gaps => write!(f, "gaps"),
            Self::PerCapita => write!(f, "per-capita"),
            Self::Scores => write!(f, "scores"),
        }
    }
}

/// Kinds of reportable conditions raised during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// No facilities to search (possibly after filtering).
    EmptyFacilitySet,
    /// A ratio had a zero denominator.
    DivideByZero,
    /// Input rows were missing or had invalid required fields.
    InputValidation,
    /// Score normalization had no distance spread.
    DegenerateNormalization,
    /// Some areas had no centroid and carry undefined distances.
    UndefinedCentroid,
}

/// A structured status message from a metrics run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricNotice {
    /// Metric the notice belongs to.
    pub metric: MetricName,
    /// Kind of condition.
    pub kind: NoticeKind,
    /// Human-readable detail.
    pub message: String,
}

/// Everything computed in one metrics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessMetrics {
    /// Options the run was computed with.
    pub options: MetricsOptions,
    /// Facilities supplied to the run (before category filtering).
    pub facility_count: usize,
    /// Areas supplied to the run.
    pub area_count: usize,
    /// Per-area nearest-facility distances.
    pub distances: MetricOutcome<DistanceResult>,
    /// Statistics over the defined distances.
    pub distance_stats: MetricOutcome<DistanceStats>,
    /// Gaps ordered worst access first.
    pub gaps: MetricOutcome<Vec<Gap>>,
    /// Gap count and affected population.
    pub gap_summary: MetricOutcome<GapSummary>,
    /// Facilities per capita.
    pub per_capita: MetricOutcome<PerCapitaSummary>,
    /// Composite access scores.
    pub scores: MetricOutcome<AccessScores>,
    /// Conditions raised while computing.
    pub notices: Vec<MetricNotice>,
}

/// An exported metrics run as written to `access_metrics.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDocument {
    /// When the run was exported.
    pub generated_at: DateTime<Utc>,
    /// The exported metrics.
    pub metrics: AccessMetrics,
}

impl MetricsDocument {
    /// Stamps `metrics` with the current time.
    #[must_use]
    pub fn now(metrics: AccessMetrics) -> Self {
        Self {
            generated_at: Utc::now(),
            metrics,
        }
    }
}
