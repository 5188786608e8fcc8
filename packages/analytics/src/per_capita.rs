//! Aggregate facilities-per-capita ratio.

use care_access_analytics_models::PerCapitaSummary;
use care_access_geography_models::Area;

use crate::AnalyticsError;

/// Computes facilities per 10,000 and per 100,000 residents.
///
/// # Errors
///
/// Returns [`AnalyticsError::DivideByZero`] if `total_population` is zero.
/// This is reportable, not fatal: other metrics should still be computed.
#[allow(clippy::cast_precision_loss)]
pub fn compute_facilities_per_capita(
    facility_count: u64,
    total_population: u64,
) -> Result<PerCapitaSummary, AnalyticsError> {
    if total_population == 0 {
        return Err(AnalyticsError::DivideByZero {
            metric: "facilities per capita",
        });
    }

    let ratio = facility_count as f64 / total_population as f64;

    Ok(PerCapitaSummary {
        total_facilities: facility_count,
        total_population,
        per_10k: ratio * 10_000.0,
        per_100k: ratio * 100_000.0,
    })
}

/// Sums the population of every area.
///
/// # Errors
///
/// Returns [`AnalyticsError::InputValidation`] if any area lacks a
/// population, since a partial sum would overstate access, or if the total
/// does not fit in a `u64`.
pub fn total_population(areas: &[Area]) -> Result<u64, AnalyticsError> {
    let missing: Vec<&str> = areas
        .iter()
        .filter(|a| a.population.is_none())
        .map(|a| a.geoid.as_str())
        .collect();

    if !missing.is_empty() {
        return Err(AnalyticsError::InputValidation {
            message: format!(
                "{} area(s) have no valid population (first: {})",
                missing.len(),
                missing[0]
            ),
        });
    }

    areas
        .iter()
        .filter_map(|a| a.population)
        .try_fold(0_u64, u64::checked_add)
        .ok_or_else(|| AnalyticsError::InputValidation {
            message: "total population overflows a 64-bit total".to_string(),
        })
}
