//! Nearest-facility distance for every area.
//!
//! Issues one 1-nearest-neighbor query per area centroid and converts the
//! angular result to kilometers with a fixed scale factor. Areas without a
//! centroid get an explicit undefined entry; they are never dropped and
//! never zero-filled.

use care_access_analytics_models::{AreaDistance, DistanceResult};
use care_access_geography_models::Area;
use care_access_spatial::FacilityIndex;

use crate::progress::{NullProgress, ProgressCallback};

/// Kilometers per degree, applied uniformly to latitude and longitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Computes the distance from each area's centroid to the nearest indexed
/// facility.
///
/// The result has exactly one entry per area, in input order.
#[must_use]
pub fn compute_nearest_distances(areas: &[Area], index: &FacilityIndex) -> DistanceResult {
    compute_nearest_distances_with_progress(areas, index, &NullProgress)
}

/// Same as [`compute_nearest_distances`], advancing `progress` by one unit
/// per area.
#[must_use]
pub fn compute_nearest_distances_with_progress(
    areas: &[Area],
    index: &FacilityIndex,
    progress: &dyn ProgressCallback,
) -> DistanceResult {
    progress.set_total(areas.len() as u64);

    let entries: Vec<AreaDistance> = areas
        .iter()
        .map(|area| {
            let distance_km = area
                .centroid
                .and_then(|c| index.nearest(c.lat, c.lon))
                .map(|nearest| nearest.distance_deg * KM_PER_DEGREE);
            progress.inc(1);
            AreaDistance {
                geoid: area.geoid.clone(),
                distance_km,
            }
        })
        .collect();

    let undefined = entries.iter().filter(|e| e.distance_km.is_none()).count();
    log::info!(
        "Computed nearest-facility distances for {} areas ({undefined} without centroid)",
        entries.len()
    );
    progress.finish(format!("{} areas measured", entries.len()));

    DistanceResult::new(entries)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use care_access_facility_models::{Facility, FacilityCategory};
    use care_access_geography_models::Centroid;

    use super::*;

    fn scenario() -> (Vec<Facility>, Vec<Area>) {
        let facilities = vec![
            Facility::new(FacilityCategory::Hospital, 34.05, -118.25),
            Facility::new(FacilityCategory::Clinic, 34.10, -118.30),
        ];
        let areas = vec![
            Area::new("T1", Some(Centroid::new(34.05, -118.25)), Some(1000)),
            Area::new("T2", Some(Centroid::new(34.20, -118.40)), Some(500)),
            Area::new("T3", None, Some(200)),
        ];
        (facilities, areas)
    }

    #[test]
    fn one_entry_per_area_in_input_order() {
        let (facilities, areas) = scenario();
        let index = FacilityIndex::build(&facilities, None).unwrap();
        let result = compute_nearest_distances(&areas, &index);

        let geoids: Vec<&str> = result.iter().map(|e| e.geoid.as_str()).collect();
        assert_eq!(geoids, ["T1", "T2", "T3"]);
    }

    #[test]
    fn converts_degrees_to_kilometers() {
        let (facilities, areas) = scenario();
        let index = FacilityIndex::build(&facilities, None).unwrap();
        let result = compute_nearest_distances(&areas, &index);

        let t1 = result.get("T1").unwrap().unwrap();
        assert!(t1.abs() < 1e-9, "T1 sits on a facility, got {t1}");

        // Nearest to T2 is the clinic at (34.10, -118.30).
        let expected = 0.1_f64.hypot(0.1) * KM_PER_DEGREE;
        let t2 = result.get("T2").unwrap().unwrap();
        assert!((t2 - expected).abs() < 1e-9, "T2: got {t2} expected {expected}");
    }

    #[test]
    fn missing_centroid_is_undefined_not_zero() {
        let (facilities, areas) = scenario();
        let index = FacilityIndex::build(&facilities, None).unwrap();
        let result = compute_nearest_distances(&areas, &index);

        assert_eq!(result.len(), areas.len());
        assert_eq!(result.get("T3"), Some(None));
    }

    struct CountingProgress {
        total: AtomicU64,
        done: AtomicU64,
    }

    impl ProgressCallback for CountingProgress {
        fn set_total(&self, total: u64) {
            self.total.store(total, Ordering::Relaxed);
        }
        fn inc(&self, delta: u64) {
            self.done.fetch_add(delta, Ordering::Relaxed);
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
    }

    #[test]
    fn reports_one_unit_per_area() {
        let (facilities, areas) = scenario();
        let index = FacilityIndex::build(&facilities, None).unwrap();
        let progress = CountingProgress {
            total: AtomicU64::new(0),
            done: AtomicU64::new(0),
        };

        let _ = compute_nearest_distances_with_progress(&areas, &index, &progress);

        assert_eq!(progress.total.load(Ordering::Relaxed), 3);
        assert_eq!(progress.done.load(Ordering::Relaxed), 3);
    }
}
