#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for nearest-facility lookups.
//!
//! Bulk-loads facility coordinates into an R-tree and answers
//! 1-nearest-neighbor queries. Coordinates are indexed in raw degree space
//! (`[lat, lon]`, no projection), so ranking is a flat-Euclidean
//! approximation that only holds at county scale.
//!
//! The index is immutable once built. Filtering by category builds a fresh
//! index over the matching subset.

use care_access_facility_models::{Facility, FacilityCategory};
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use thiserror::Error;

/// Errors that can occur while building a [`FacilityIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// No facilities matched, so there is nothing to search.
    #[error("No facilities available{}", describe_filter(.category))]
    EmptyFacilitySet {
        /// Category filter that produced the empty set, if any.
        category: Option<FacilityCategory>,
    },
}

#[allow(clippy::ref_option)]
fn describe_filter(category: &Option<FacilityCategory>) -> String {
    category.map_or_else(String::new, |c| format!(" for category '{c}'"))
}

/// A facility coordinate stored in the R-tree, pointing back at its
/// position in the source slice.
#[derive(Debug, Clone, Copy)]
struct IndexedFacility {
    idx: usize,
    lat: f64,
    lon: f64,
}

impl RTreeObject for IndexedFacility {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

impl PointDistance for IndexedFacility {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlon = self.lon - point[1];
        dlat.mul_add(dlat, dlon * dlon)
    }
}

/// Result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestFacility {
    /// Index of the facility in the slice the index was built from.
    pub facility_idx: usize,
    /// Euclidean distance in degrees.
    pub distance_deg: f64,
}

/// Static nearest-neighbor index over facility coordinates.
pub struct FacilityIndex {
    tree: RTree<IndexedFacility>,
    category: Option<FacilityCategory>,
}

impl FacilityIndex {
    /// Builds an index over `facilities`, optionally restricted to a single
    /// category. Facilities with non-finite coordinates are never indexed.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyFacilitySet`] if no facility survives the
    /// filter. Callers should treat this as "metric unavailable for this
    /// filter" rather than a fatal error.
    pub fn build(
        facilities: &[Facility],
        category: Option<FacilityCategory>,
    ) -> Result<Self, SpatialError> {
        let entries: Vec<IndexedFacility> = facilities
            .iter()
            .enumerate()
            .filter(|(_, f)| category.is_none_or(|c| f.category == c))
            .map(|(idx, f)| IndexedFacility {
                idx,
                lat: f.lat,
                lon: f.lon,
            })
            .collect();

        let matching = entries.len();
        let entries: Vec<IndexedFacility> = entries
            .into_iter()
            .filter(|e| e.lat.is_finite() && e.lon.is_finite())
            .collect();
        if entries.len() < matching {
            log::warn!(
                "Skipped {} facilities with non-finite coordinates",
                matching - entries.len()
            );
        }

        if entries.is_empty() {
            return Err(SpatialError::EmptyFacilitySet { category });
        }

        log::debug!(
            "Indexed {} of {} facilities{}",
            entries.len(),
            facilities.len(),
            describe_filter(&category)
        );

        Ok(Self {
            tree: RTree::bulk_load(entries),
            category,
        })
    }

    /// Number of indexed facilities. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Always `false`; construction rejects empty facility sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Category filter this index was built with.
    #[must_use]
    pub const fn category(&self) -> Option<FacilityCategory> {
        self.category
    }

    /// Finds the facility closest to `(lat, lon)` in degree space.
    ///
    /// Returns `None` when either query coordinate is not finite.
    #[must_use]
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<NearestFacility> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        let query = [lat, lon];
        self.tree.nearest_neighbor(&query).map(|f| NearestFacility {
            facility_idx: f.idx,
            distance_deg: f.distance_2(&query).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facilities() -> Vec<Facility> {
        vec![
            Facility::new(FacilityCategory::Hospital, 34.05, -118.25),
            Facility::new(FacilityCategory::Clinic, 34.10, -118.30),
            Facility::new(FacilityCategory::UrgentCare, 33.90, -118.10),
        ]
    }

    fn brute_force(facilities: &[Facility], lat: f64, lon: f64) -> f64 {
        facilities
            .iter()
            .map(|f| (f.lat - lat).hypot(f.lon - lon))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn exact_match_has_zero_distance() {
        let index = FacilityIndex::build(&facilities(), None).unwrap();
        let nearest = index.nearest(34.05, -118.25).unwrap();
        assert_eq!(nearest.facility_idx, 0);
        assert!(nearest.distance_deg.abs() < 1e-12);
    }

    #[test]
    fn matches_brute_force_minimum() {
        let facilities = facilities();
        let index = FacilityIndex::build(&facilities, None).unwrap();

        for (lat, lon) in [
            (34.20, -118.40),
            (33.95, -118.15),
            (34.00, -118.00),
            (35.00, -119.00),
        ] {
            let nearest = index.nearest(lat, lon).unwrap();
            let expected = brute_force(&facilities, lat, lon);
            assert!(
                (nearest.distance_deg - expected).abs() < 1e-12,
                "({lat}, {lon}): got {} expected {expected}",
                nearest.distance_deg
            );
            assert!(nearest.distance_deg >= 0.0);
        }
    }

    #[test]
    fn category_filter_restricts_candidates() {
        let facilities = facilities();
        let index = FacilityIndex::build(&facilities, Some(FacilityCategory::UrgentCare)).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.category(), Some(FacilityCategory::UrgentCare));

        // The hospital sits exactly here, but only urgent care is indexed.
        let nearest = index.nearest(34.05, -118.25).unwrap();
        assert_eq!(nearest.facility_idx, 2);
        assert!(nearest.distance_deg > 0.0);
    }

    #[test]
    fn empty_filter_result_is_an_error() {
        let err = FacilityIndex::build(&facilities(), Some(FacilityCategory::Other))
            .err()
            .unwrap();
        assert_eq!(
            err,
            SpatialError::EmptyFacilitySet {
                category: Some(FacilityCategory::Other)
            }
        );
        assert_eq!(
            err.to_string(),
            "No facilities available for category 'other'"
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            FacilityIndex::build(&[], None),
            Err(SpatialError::EmptyFacilitySet { category: None })
        ));
    }

    #[test]
    fn non_finite_query_has_no_nearest() {
        let index = FacilityIndex::build(&facilities(), None).unwrap();
        assert_eq!(index.nearest(f64::NAN, -118.25), None);
        assert_eq!(index.nearest(34.05, f64::NEG_INFINITY), None);
    }

    #[test]
    fn non_finite_facilities_are_not_indexed() {
        let mut facilities = facilities();
        facilities.push(Facility::new(FacilityCategory::Hospital, f64::NAN, -118.0));

        let index = FacilityIndex::build(&facilities, None).unwrap();
        assert_eq!(index.len(), 3);

        let only_bad = vec![Facility::new(FacilityCategory::Clinic, 34.0, f64::INFINITY)];
        assert_eq!(
            FacilityIndex::build(&only_bad, None).err(),
            Some(SpatialError::EmptyFacilitySet { category: None })
        );
    }
}
