//! Facility list cleaning: bounding-box filter and exact-duplicate removal.

use std::collections::BTreeSet;

use care_access_facility_models::Facility;
use care_access_geography_models::BoundingBox;
use serde::Serialize;

/// Counts from one [`clean_facilities`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub kept: usize,
    pub out_of_bounds: usize,
    pub duplicates: usize,
}

/// Drops facilities outside `bounds` (inclusive) and facilities whose exact
/// coordinates were already seen. The first occurrence wins and input order
/// is preserved.
#[must_use]
pub fn clean_facilities(
    facilities: Vec<Facility>,
    bounds: Option<&BoundingBox>,
) -> (Vec<Facility>, CleanReport) {
    let mut report = CleanReport::default();
    let mut seen = BTreeSet::new();

    let kept: Vec<Facility> = facilities
        .into_iter()
        .filter(|f| {
            if bounds.is_some_and(|b| !b.contains(f.lat, f.lon)) {
                report.out_of_bounds += 1;
                return false;
            }
            if !seen.insert((f.lat.to_bits(), f.lon.to_bits())) {
                report.duplicates += 1;
                return false;
            }
            true
        })
        .collect();

    report.kept = kept.len();
    log::info!(
        "Kept {} facilities ({} out of bounds, {} duplicates)",
        report.kept,
        report.out_of_bounds,
        report.duplicates
    );

    (kept, report)
}
