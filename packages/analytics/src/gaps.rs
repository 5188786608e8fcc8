//! Access-gap classification.
//!
//! An area is a gap (an "access desert") when its nearest facility is
//! farther than a caller-supplied threshold. Gaps are ordered worst access
//! first; ties keep input order.

use std::collections::BTreeMap;

use care_access_analytics_models::{DistanceResult, Gap, GapSummary};
use care_access_geography_models::Area;

use crate::AnalyticsError;

/// Returns the areas whose defined distance exceeds `threshold_km`, sorted
/// by descending distance.
///
/// The threshold is used as given: `0.0` keeps every area with a positive
/// distance and `f64::INFINITY` keeps none. Undefined distances and
/// distances naming an unknown area are skipped. Never fails; no match is
/// an empty list.
#[must_use]
pub fn identify_gaps(areas: &[Area], distances: &DistanceResult, threshold_km: f64) -> Vec<Gap> {
    let by_geoid: BTreeMap<&str, &Area> = areas.iter().map(|a| (a.geoid.as_str(), a)).collect();

    let mut gaps: Vec<Gap> = distances
        .defined()
        .filter(|(_, distance_km)| *distance_km > threshold_km)
        .filter_map(|(geoid, distance_km)| {
            by_geoid.get(geoid).map(|area| Gap {
                area: (*area).clone(),
                distance_km,
            })
        })
        .collect();

    // `sort_by` is stable, so equal distances stay in input order.
    gaps.sort_by(|a, b| b.distance_km.total_cmp(&a.distance_km));

    log::info!(
        "Found {} areas farther than {threshold_km} km from a facility",
        gaps.len()
    );

    gaps
}

/// Counts the gaps and the residents living in them.
///
/// # Errors
///
/// Returns [`AnalyticsError::InputValidation`] if the affected population
/// does not fit in a `u64`.
pub fn summarize_gaps(gaps: &[Gap], threshold_km: f64) -> Result<GapSummary, AnalyticsError> {
    let affected_population = gaps
        .iter()
        .filter_map(|g| g.area.population)
        .try_fold(0_u64, u64::checked_add)
        .ok_or_else(|| AnalyticsError::InputValidation {
            message: "population living in gap areas overflows a 64-bit total".to_string(),
        })?;
    let unknown_population = gaps.iter().filter(|g| g.area.population.is_none()).count();

    Ok(GapSummary {
        threshold_km,
        count: gaps.len(),
        affected_population,
        unknown_population,
    })
}

#[cfg(test)]
mod tests {
    use care_access_analytics_models::AreaDistance;
    use care_access_geography_models::Centroid;

    use super::*;

    fn fixture(values: &[(&str, Option<f64>)]) -> (Vec<Area>, DistanceResult) {
        let areas = values
            .iter()
            .map(|(geoid, d)| {
                Area::new(*geoid, d.map(|_| Centroid::new(34.0, -118.0)), Some(100))
            })
            .collect();
        let distances = DistanceResult::new(
            values
                .iter()
                .map(|(geoid, d)| AreaDistance {
                    geoid: (*geoid).to_string(),
                    distance_km: *d,
                })
                .collect(),
        );
        (areas, distances)
    }

    fn geoids(gaps: &[Gap]) -> Vec<&str> {
        gaps.iter().map(|g| g.area.geoid.as_str()).collect()
    }

    #[test]
    fn keeps_only_areas_beyond_threshold_worst_first() {
        let (areas, distances) = fixture(&[
            ("A", Some(3.0)),
            ("B", Some(12.0)),
            ("C", None),
            ("D", Some(7.5)),
            ("E", Some(5.0)),
        ]);

        let gaps = identify_gaps(&areas, &distances, 5.0);

        assert_eq!(geoids(&gaps), ["B", "D"]);
        assert_eq!(gaps[0].distance_km, 12.0);
        assert_eq!(gaps[1].distance_km, 7.5);
    }

    #[test]
    fn ties_keep_input_order() {
        let (areas, distances) = fixture(&[
            ("A", Some(6.0)),
            ("B", Some(9.0)),
            ("C", Some(6.0)),
            ("D", Some(9.0)),
        ]);

        let gaps = identify_gaps(&areas, &distances, 5.0);

        assert_eq!(geoids(&gaps), ["B", "D", "A", "C"]);
    }

    #[test]
    fn zero_threshold_keeps_every_positive_distance() {
        let (areas, distances) = fixture(&[
            ("A", Some(0.0)),
            ("B", Some(0.1)),
            ("C", None),
            ("D", Some(2.0)),
        ]);

        let gaps = identify_gaps(&areas, &distances, 0.0);

        assert_eq!(geoids(&gaps), ["D", "B"]);
    }

    #[test]
    fn infinite_threshold_keeps_nothing() {
        let (areas, distances) = fixture(&[("A", Some(1.0e6)), ("B", Some(3.0))]);
        assert!(identify_gaps(&areas, &distances, f64::INFINITY).is_empty());
    }

    #[test]
    fn all_undefined_is_empty_not_error() {
        let (areas, distances) = fixture(&[("A", None), ("B", None)]);
        assert!(identify_gaps(&areas, &distances, 5.0).is_empty());
    }

    #[test]
    fn is_deterministic() {
        let (areas, distances) = fixture(&[
            ("A", Some(8.0)),
            ("B", Some(8.0)),
            ("C", Some(11.0)),
        ]);

        let first = identify_gaps(&areas, &distances, 5.0);
        let second = identify_gaps(&areas, &distances, 5.0);

        assert_eq!(first, second);
    }

    #[test]
    fn summary_sums_known_populations() {
        let areas = vec![
            Area::new("A", None, Some(300)),
            Area::new("B", None, None),
            Area::new("C", None, Some(200)),
        ];
        let gaps: Vec<Gap> = areas
            .into_iter()
            .map(|area| Gap {
                area,
                distance_km: 10.0,
            })
            .collect();

        let summary = summarize_gaps(&gaps, 5.0).unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.affected_population, 500);
        assert_eq!(summary.unknown_population, 1);
        assert_eq!(summary.threshold_km, 5.0);
    }

    #[test]
    fn summary_overflow_is_input_validation() {
        let gaps: Vec<Gap> = ["A", "B"]
            .into_iter()
            .map(|geoid| Gap {
                area: Area::new(geoid, None, Some(u64::MAX)),
                distance_km: 10.0,
            })
            .collect();

        let err = summarize_gaps(&gaps, 5.0).unwrap_err();
        assert!(matches!(err, AnalyticsError::InputValidation { .. }), "{err}");
    }
}
