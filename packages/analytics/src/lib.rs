#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Healthcare access metrics engine.
//!
//! Computes, for every area, the distance to the nearest facility and
//! derives the access metrics built on top of it: the ordered list of
//! access gaps, the aggregate facilities-per-capita ratio, and a
//! normalized 0-100 access score. [`metrics::compute_access_metrics`] runs
//! them all as one pass and collects partial results when individual
//! metrics are unavailable.

pub mod distance;
pub mod gaps;
pub mod metrics;
pub mod per_capita;
pub mod progress;
pub mod report;
pub mod score;
pub mod stats;

use care_access_analytics_models::NoticeKind;
use care_access_spatial::SpatialError;
use thiserror::Error;

pub use distance::{KM_PER_DEGREE, compute_nearest_distances};
pub use gaps::{identify_gaps, summarize_gaps};
pub use metrics::{compute_access_metrics, facilities_unavailable};
pub use per_capita::{compute_facilities_per_capita, total_population};
pub use score::compute_access_score;
pub use stats::summarize_distances;

/// Errors that can occur while computing access metrics.
///
/// None of these abort a whole run: the orchestration layer turns each one
/// into an unavailable metric and keeps computing the others.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// No facilities to search, possibly after category filtering.
    #[error(transparent)]
    EmptyFacilitySet(#[from] SpatialError),

    /// A per-capita ratio was requested against zero population.
    #[error("Cannot compute {metric}: total population is zero")]
    DivideByZero {
        /// Ratio that could not be computed.
        metric: &'static str,
    },

    /// Input rows lacked a field the metric depends on.
    #[error("Invalid input: {message}")]
    InputValidation {
        /// Description of what went wrong.
        message: String,
    },
}

impl AnalyticsError {
    /// Notice kind reported when this error makes a metric unavailable.
    #[must_use]
    pub const fn notice_kind(&self) -> NoticeKind {
        match self {
            Self::EmptyFacilitySet(_) => NoticeKind::EmptyFacilitySet,
            Self::DivideByZero { .. } => NoticeKind::DivideByZero,
            Self::InputValidation { .. } => NoticeKind::InputValidation,
        }
    }
}
