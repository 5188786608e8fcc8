//! Composite 0-100 access score.
//!
//! The score is a weighted sum of normalized components, each in `[0, 1]`
//! where higher means better access, scaled to `[0, 100]`. Distance is the
//! only component today:
//!
//! ```text
//! distance component = 1 - distance / max_distance
//! ```
//!
//! where `max_distance` is the largest defined distance in the batch.
//! Additional components (per-capita density, socioeconomic indicators)
//! slot into `COMPONENTS` without changing [`compute_access_score`].
//!
//! Degenerate batches:
//!
//! * `max == min > 0`: every score is `0`, exactly as the formula gives.
//! * `max == 0` (every area sits on a facility): the formula is `0 / 0`, so
//!   every score is `100`.
//!
//! Both set [`AccessScores::degenerate`].

use care_access_analytics_models::{AccessScores, AreaScore, DistanceResult};

/// An input dimension of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreComponent {
    /// Inverse normalized distance to the nearest facility.
    Distance,
}

/// Components and their weights. Weights sum to 1.
const COMPONENTS: &[(ScoreComponent, f64)] = &[(ScoreComponent::Distance, 1.0)];

/// Normalization bounds for the batch.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: f64,
    max: f64,
}

impl ScoreComponent {
    /// Normalized value in `[0, 1]` for one area.
    fn normalized(self, distance_km: f64, bounds: Bounds) -> f64 {
        match self {
            Self::Distance => {
                if bounds.max > 0.0 {
                    1.0 - distance_km / bounds.max
                } else {
                    1.0
                }
            }
        }
    }
}

/// Scores every area with a defined distance.
///
/// Areas with an undefined distance get no score. The result keeps input
/// order and every score lies in `[0, 100]`.
#[must_use]
pub fn compute_access_score(distances: &DistanceResult) -> AccessScores {
    let bounds = distances.defined().fold(None, |acc: Option<Bounds>, (_, d)| {
        Some(acc.map_or(Bounds { min: d, max: d }, |b| Bounds {
            min: b.min.min(d),
            max: b.max.max(d),
        }))
    });

    let Some(bounds) = bounds else {
        return AccessScores::default();
    };

    #[allow(clippy::float_cmp)]
    let degenerate = bounds.max == bounds.min;
    if degenerate {
        log::warn!(
            "Degenerate score normalization: every defined distance is {} km",
            bounds.max
        );
    }

    let scores = distances
        .defined()
        .map(|(geoid, distance_km)| {
            let weighted: f64 = COMPONENTS
                .iter()
                .map(|(component, weight)| weight * component.normalized(distance_km, bounds))
                .sum();
            AreaScore {
                geoid: geoid.to_string(),
                score: (weighted * 100.0).clamp(0.0, 100.0),
            }
        })
        .collect();

    AccessScores {
        scores,
        max_distance_km: Some(bounds.max),
        min_distance_km: Some(bounds.min),
        degenerate,
    }
}

#[cfg(test)]
mod tests {
    use care_access_analytics_models::AreaDistance;

    use super::*;

    fn result(values: &[Option<f64>]) -> DistanceResult {
        DistanceResult::new(
            values
                .iter()
                .enumerate()
                .map(|(i, d)| AreaDistance {
                    geoid: format!("A{i}"),
                    distance_km: *d,
                })
                .collect(),
        )
    }

    #[test]
    fn closest_is_100_farthest_is_0() {
        let scores = compute_access_score(&result(&[Some(0.0), Some(5.0), Some(10.0)]));

        assert_eq!(scores.get("A0"), Some(100.0));
        assert_eq!(scores.get("A1"), Some(50.0));
        assert_eq!(scores.get("A2"), Some(0.0));
        assert_eq!(scores.max_distance_km, Some(10.0));
        assert!(!scores.degenerate);
    }

    #[test]
    fn undefined_distances_get_no_score() {
        let scores = compute_access_score(&result(&[Some(2.0), None, Some(8.0)]));

        assert_eq!(scores.scores.len(), 2);
        assert_eq!(scores.get("A1"), None);
        let geoids: Vec<&str> = scores.scores.iter().map(|s| s.geoid.as_str()).collect();
        assert_eq!(geoids, ["A0", "A2"]);
    }

    #[test]
    fn scores_stay_in_range() {
        let scores = compute_access_score(&result(&[
            Some(0.3),
            Some(17.2),
            Some(4.9),
            None,
            Some(0.0),
            Some(120.5),
        ]));

        for s in &scores.scores {
            assert!(
                (0.0..=100.0).contains(&s.score),
                "{} out of range: {}",
                s.geoid,
                s.score
            );
        }
    }

    #[test]
    fn identical_positive_distances_score_zero() {
        let scores = compute_access_score(&result(&[Some(4.0), Some(4.0), Some(4.0)]));

        assert!(scores.degenerate);
        assert!(scores.scores.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn all_zero_distances_score_full() {
        let scores = compute_access_score(&result(&[Some(0.0), Some(0.0)]));

        assert!(scores.degenerate);
        assert!(scores.scores.iter().all(|s| s.score == 100.0));
    }

    #[test]
    fn no_defined_distances_is_empty() {
        let scores = compute_access_score(&result(&[None, None]));

        assert!(scores.scores.is_empty());
        assert_eq!(scores.max_distance_km, None);
        assert!(!scores.degenerate);
    }
}
