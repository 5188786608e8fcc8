//! Human-readable rendering of computed metrics.
//!
//! Pure formatting: everything printed here was already computed by
//! [`crate::metrics`].

use std::fmt::Write as _;

use care_access_analytics_models::{AccessMetrics, Gap, MetricOutcome};

const RULE_WIDTH: usize = 60;

/// Renders the summary report for a metrics run.
#[must_use]
pub fn render_summary_report(metrics: &AccessMetrics) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "HEALTHCARE ACCESS SUMMARY REPORT");
    if let Some(category) = metrics.options.category {
        let _ = writeln!(out, "Facility category: {category}");
    }
    let _ = writeln!(out, "{rule}");

    match &metrics.per_capita {
        MetricOutcome::Available { value } => {
            let _ = writeln!(out, "\nTotal Facilities: {}", value.total_facilities);
            let _ = writeln!(
                out,
                "Total Population: {}",
                format_thousands(value.total_population)
            );
            let _ = writeln!(out, "Facilities per 10,000: {:.2}", value.per_10k);
            let _ = writeln!(out, "Facilities per 100,000: {:.2}", value.per_100k);
        }
        MetricOutcome::Unavailable { reason } => {
            let _ = writeln!(out, "\nTotal Facilities: {}", metrics.facility_count);
            let _ = writeln!(out, "Per-capita figures unavailable: {reason}");
        }
    }

    let _ = writeln!(out, "\nDistance to Nearest Facility:");
    match &metrics.distance_stats {
        MetricOutcome::Available { value } => {
            let _ = writeln!(out, "  Mean: {}", format_km(value.mean_km));
            let _ = writeln!(out, "  Median: {}", format_km(value.median_km));
            let _ = writeln!(out, "  Max: {}", format_km(value.max_km));
            if value.undefined > 0 {
                let _ = writeln!(out, "  Areas without centroid: {}", value.undefined);
            }
        }
        MetricOutcome::Unavailable { reason } => {
            let _ = writeln!(out, "  Unavailable: {reason}");
        }
    }

    match &metrics.gap_summary {
        MetricOutcome::Available { value } => {
            let _ = writeln!(
                out,
                "\nUnderserved Areas (>{}km from facility): {}",
                value.threshold_km, value.count
            );
            if value.count > 0 {
                let _ = writeln!(
                    out,
                    "  Population affected: {}",
                    format_thousands(value.affected_population)
                );
                if value.unknown_population > 0 {
                    let _ = writeln!(
                        out,
                        "  Areas with unknown population: {}",
                        value.unknown_population
                    );
                }
            }
        }
        MetricOutcome::Unavailable { reason } => {
            let _ = writeln!(out, "\nUnderserved Areas: unavailable ({reason})");
        }
    }

    let _ = writeln!(out, "{rule}");
    out
}

/// Renders the `limit` worst gaps as a fixed-width table.
#[must_use]
pub fn render_gap_table(gaps: &[Gap], limit: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<16} {:>12} {:>12}", "#", "GEOID", "DIST (km)", "POPULATION");

    for (rank, gap) in gaps.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        let population = gap
            .area
            .population
            .map_or_else(|| "-".to_string(), format_thousands);
        let _ = writeln!(
            out,
            "{:>4}  {:<16} {:>12.2} {:>12}",
            rank + 1,
            gap.area.geoid,
            gap.distance_km,
            population
        );
    }

    out
}

fn format_km(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2} km"))
}

/// Formats an integer with `,` thousands separators.
fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
