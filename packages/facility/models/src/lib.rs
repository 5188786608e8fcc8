#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Healthcare facility records and category taxonomy.
//!
//! Every facility source is normalized into a [`Facility`] carrying one of
//! the fixed [`FacilityCategory`] variants. Free-text facility types coming
//! from upstream datasets are mapped onto the taxonomy with
//! [`FacilityCategory::from_facility_type`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Keywords that classify a facility type as urgent care.
const URGENT_CARE_KEYWORDS: &[&str] = &["urgent care", "urgent", "walk-in"];

/// Keywords that classify a facility type as a hospital.
const HOSPITAL_KEYWORDS: &[&str] = &["hospital", "medical center", "emergency"];

/// Keywords that classify a facility type as a clinic.
const CLINIC_KEYWORDS: &[&str] = &["clinic", "health center", "community health"];

/// Top-level healthcare facility categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FacilityCategory {
    /// Walk-in urgent care centers
    UrgentCare,
    /// Hospitals, medical centers, and emergency departments
    Hospital,
    /// Clinics and community health centers
    Clinic,
    /// A known facility type that fits none of the other categories
    Other,
    /// No facility type was provided
    Unknown,
}

impl FacilityCategory {
    /// Classifies a free-text facility type (e.g. `"Community Health
    /// Center"`) by case-insensitive keyword match.
    ///
    /// Urgent care keywords are checked first, then hospital, then clinic,
    /// so `"Urgent Care Clinic"` is [`Self::UrgentCare`]. A missing or blank
    /// type is [`Self::Unknown`].
    #[must_use]
    pub fn from_facility_type(facility_type: Option<&str>) -> Self {
        let Some(facility_type) = facility_type.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Unknown;
        };

        let lowered = facility_type.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

        if matches(URGENT_CARE_KEYWORDS) {
            Self::UrgentCare
        } else if matches(HOSPITAL_KEYWORDS) {
            Self::Hospital
        } else if matches(CLINIC_KEYWORDS) {
            Self::Clinic
        } else {
            Self::Other
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UrgentCare,
            Self::Hospital,
            Self::Clinic,
            Self::Other,
            Self::Unknown,
        ]
    }
}

/// A healthcare facility location.
///
/// Facilities are read once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    /// Facility name, when the source provides one.
    pub name: Option<String>,
    /// Normalized facility category.
    pub category: FacilityCategory,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl Facility {
    /// Creates an unnamed facility.
    #[must_use]
    pub const fn new(category: FacilityCategory, lat: f64, lon: f64) -> Self {
        Self {
            name: None,
            category,
            lat,
            lon,
        }
    }

    /// Attaches a name to this facility.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_by_keyword() {
        let cases = [
            ("Urgent Care", FacilityCategory::UrgentCare),
            ("Walk-In Clinic", FacilityCategory::UrgentCare),
            ("General Acute Care Hospital", FacilityCategory::Hospital),
            ("Emergency Department", FacilityCategory::Hospital),
            ("Medical Center", FacilityCategory::Hospital),
            ("Community Health Center", FacilityCategory::Clinic),
            ("Free Clinic", FacilityCategory::Clinic),
            ("Pharmacy", FacilityCategory::Other),
        ];

        for (facility_type, expected) in cases {
            assert_eq!(
                FacilityCategory::from_facility_type(Some(facility_type)),
                expected,
                "wrong category for {facility_type:?}"
            );
        }
    }

    #[test]
    fn urgent_care_wins_over_clinic() {
        assert_eq!(
            FacilityCategory::from_facility_type(Some("Urgent Care Clinic")),
            FacilityCategory::UrgentCare
        );
    }

    #[test]
    fn missing_type_is_unknown() {
        assert_eq!(
            FacilityCategory::from_facility_type(None),
            FacilityCategory::Unknown
        );
        assert_eq!(
            FacilityCategory::from_facility_type(Some("   ")),
            FacilityCategory::Unknown
        );
    }

    #[test]
    fn category_string_roundtrip() {
        for category in FacilityCategory::all() {
            let parsed: FacilityCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, *category);
        }
        assert_eq!(
            "URGENT_CARE".parse::<FacilityCategory>().unwrap(),
            FacilityCategory::UrgentCare
        );
        assert!("pharmacy".parse::<FacilityCategory>().is_err());
    }
}
