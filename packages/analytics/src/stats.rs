//! Summary statistics over per-area distances.

use care_access_analytics_models::{DistanceResult, DistanceStats};

/// Computes mean, median, min, and max over the defined distances.
///
/// Undefined distances are counted but never folded into the statistics.
/// With no defined distances every statistic is `None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_distances(distances: &DistanceResult) -> DistanceStats {
    let mut defined: Vec<f64> = distances.defined().map(|(_, d)| d).collect();
    let undefined = distances.len() - defined.len();

    if defined.is_empty() {
        return DistanceStats {
            undefined,
            ..DistanceStats::default()
        };
    }

    defined.sort_by(f64::total_cmp);

    let count = defined.len();
    let mean = defined.iter().sum::<f64>() / count as f64;
    let mid = count / 2;
    let median = if count % 2 == 0 {
        f64::midpoint(defined[mid - 1], defined[mid])
    } else {
        defined[mid]
    };

    DistanceStats {
        defined: count,
        undefined,
        mean_km: Some(mean),
        median_km: Some(median),
        min_km: defined.first().copied(),
        max_km: defined.last().copied(),
    }
}
