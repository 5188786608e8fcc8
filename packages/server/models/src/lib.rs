#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the care access server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the exported metrics document so the API contract can evolve
//! independently of the file format.

use care_access_analytics_models::{
    DistanceStats, GapSummary, MetricNotice, MetricOutcome, MetricsDocument, PerCapitaSummary,
};
use care_access_facility_models::FacilityCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether an exported metrics file was loaded at startup.
    pub metrics_loaded: bool,
}

/// Headline figures for the loaded metrics run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// When the metrics were exported.
    pub generated_at: DateTime<Utc>,
    /// Gap threshold the run used.
    pub threshold_km: f64,
    /// Facility category filter the run used.
    pub category: Option<FacilityCategory>,
    /// Facilities supplied to the run.
    pub facility_count: usize,
    /// Areas supplied to the run.
    pub area_count: usize,
    /// Distance statistics.
    pub distance_stats: MetricOutcome<DistanceStats>,
    /// Facilities per capita.
    pub per_capita: MetricOutcome<PerCapitaSummary>,
    /// Gap count and affected population.
    pub gap_summary: MetricOutcome<GapSummary>,
    /// Conditions raised while computing.
    pub notices: Vec<MetricNotice>,
}

impl From<&MetricsDocument> for ApiSummary {
    fn from(document: &MetricsDocument) -> Self {
        let metrics = &document.metrics;
        Self {
            generated_at: document.generated_at,
            threshold_km: metrics.options.threshold_km,
            category: metrics.options.category,
            facility_count: metrics.facility_count,
            area_count: metrics.area_count,
            distance_stats: metrics.distance_stats.clone(),
            per_capita: metrics.per_capita.clone(),
            gap_summary: metrics.gap_summary.clone(),
            notices: metrics.notices.clone(),
        }
    }
}

/// Query parameters for the gaps endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapQueryParams {
    /// Maximum number of gaps to return, worst first.
    pub limit: Option<usize>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable error.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
