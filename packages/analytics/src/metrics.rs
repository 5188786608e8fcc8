//! One-pass computation of every access metric.
//!
//! Builds the facility index, measures all areas, then derives gaps,
//! per-capita figures, and scores from the distance map. A metric that
//! cannot be computed becomes [`MetricOutcome::Unavailable`] plus a
//! [`MetricNotice`]; the remaining independent metrics are still computed.

use care_access_analytics_models::{
    AccessMetrics, MetricName, MetricNotice, MetricOutcome, MetricsOptions, NoticeKind,
};
use care_access_facility_models::Facility;
use care_access_geography_models::Area;
use care_access_spatial::FacilityIndex;

use crate::AnalyticsError;
use crate::distance::compute_nearest_distances_with_progress;
use crate::gaps::{identify_gaps, summarize_gaps};
use crate::per_capita::{compute_facilities_per_capita, total_population};
use crate::progress::{NullProgress, ProgressCallback};
use crate::score::compute_access_score;
use crate::stats::summarize_distances;

/// Computes every access metric for one facility/area batch.
#[must_use]
pub fn compute_access_metrics(
    facilities: &[Facility],
    areas: &[Area],
    options: &MetricsOptions,
) -> AccessMetrics {
    compute_access_metrics_with_progress(facilities, areas, options, &NullProgress)
}

/// Same as [`compute_access_metrics`], reporting per-area distance queries
/// to `progress`.
#[must_use]
pub fn compute_access_metrics_with_progress(
    facilities: &[Facility],
    areas: &[Area],
    options: &MetricsOptions,
    progress: &dyn ProgressCallback,
) -> AccessMetrics {
    let mut notices = Vec::new();

    let missing_centroids = areas
        .iter()
        .filter(|a| a.centroid.is_none_or(|c| !c.is_finite()))
        .count();
    if missing_centroids > 0 {
        notices.push(notice(
            MetricName::Distances,
            NoticeKind::UndefinedCentroid,
            format!(
                "{missing_centroids} area(s) have no usable centroid; their distance is undefined"
            ),
        ));
    }

    let mut metrics = match FacilityIndex::build(facilities, options.category) {
        Ok(index) => {
            let distances = compute_nearest_distances_with_progress(areas, &index, progress);
            let stats = summarize_distances(&distances);
            let gaps = identify_gaps(areas, &distances, options.threshold_km);
            let gap_summary = match summarize_gaps(&gaps, options.threshold_km) {
                Ok(summary) => MetricOutcome::available(summary),
                Err(e) => {
                    record(&mut notices, MetricName::Gaps, &e);
                    MetricOutcome::unavailable(e.to_string())
                }
            };
            let scores = compute_access_score(&distances);

            if scores.degenerate {
                notices.push(notice(
                    MetricName::Scores,
                    NoticeKind::DegenerateNormalization,
                    format!(
                        "every defined distance is {:.3} km; scores follow the degenerate policy",
                        scores.max_distance_km.unwrap_or_default()
                    ),
                ));
            }

            AccessMetrics {
                options: *options,
                facility_count: facilities.len(),
                area_count: areas.len(),
                distances: MetricOutcome::available(distances),
                distance_stats: MetricOutcome::available(stats),
                gaps: MetricOutcome::available(gaps),
                gap_summary,
                per_capita: MetricOutcome::unavailable("not computed"),
                scores: MetricOutcome::available(scores),
                notices: Vec::new(),
            }
        }
        Err(e) => {
            let e = AnalyticsError::from(e);
            let reason = e.to_string();
            record(&mut notices, MetricName::Distances, &e);

            AccessMetrics {
                options: *options,
                facility_count: facilities.len(),
                area_count: areas.len(),
                distances: MetricOutcome::unavailable(reason.clone()),
                distance_stats: MetricOutcome::unavailable(reason.clone()),
                gaps: MetricOutcome::unavailable(reason.clone()),
                gap_summary: MetricOutcome::unavailable(reason.clone()),
                per_capita: MetricOutcome::unavailable("not computed"),
                scores: MetricOutcome::unavailable(reason),
                notices: Vec::new(),
            }
        }
    };

    let counted_facilities = facilities
        .iter()
        .filter(|f| options.category.is_none_or(|c| f.category == c))
        .count() as u64;

    metrics.per_capita = match total_population(areas)
        .and_then(|population| compute_facilities_per_capita(counted_facilities, population))
    {
        Ok(summary) => {
            log::info!(
                "{:.2} facilities per 10,000 residents ({} facilities / {} residents)",
                summary.per_10k,
                summary.total_facilities,
                summary.total_population
            );
            MetricOutcome::available(summary)
        }
        Err(e) => {
            record(&mut notices, MetricName::PerCapita, &e);
            MetricOutcome::unavailable(e.to_string())
        }
    };

    metrics.notices = notices;
    metrics
}

/// Builds the result for a run whose facility table could not be loaded.
///
/// Every metric needs facilities (per-capita needs their count), so all of
/// them are unavailable with `reason`; the area count is still reported.
#[must_use]
pub fn facilities_unavailable(
    areas: &[Area],
    options: &MetricsOptions,
    reason: &str,
) -> AccessMetrics {
    let reason = format!("facility table unavailable: {reason}");
    let notices = [MetricName::Distances, MetricName::PerCapita]
        .into_iter()
        .map(|metric| notice(metric, NoticeKind::InputValidation, reason.clone()))
        .collect();

    AccessMetrics {
        options: *options,
        facility_count: 0,
        area_count: areas.len(),
        distances: MetricOutcome::unavailable(reason.clone()),
        distance_stats: MetricOutcome::unavailable(reason.clone()),
        gaps: MetricOutcome::unavailable(reason.clone()),
        gap_summary: MetricOutcome::unavailable(reason.clone()),
        per_capita: MetricOutcome::unavailable(reason.clone()),
        scores: MetricOutcome::unavailable(reason),
        notices,
    }
}

fn notice(metric: MetricName, kind: NoticeKind, message: String) -> MetricNotice {
    log::warn!("{metric}: {message}");
    MetricNotice {
        metric,
        kind,
        message,
    }
}

fn record(notices: &mut Vec<MetricNotice>, metric: MetricName, error: &AnalyticsError) {
    notices.push(notice(metric, error.notice_kind(), error.to_string()));
}

#[cfg(test)]
mod tests {
    use care_access_facility_models::FacilityCategory;
    use care_access_geography_models::Centroid;

    use super::*;
    use crate::distance::KM_PER_DEGREE;

    fn facilities() -> Vec<Facility> {
        vec![
            Facility::new(FacilityCategory::Hospital, 34.05, -118.25),
            Facility::new(FacilityCategory::Clinic, 34.10, -118.30),
        ]
    }

    fn areas() -> Vec<Area> {
        vec![
            Area::new("T1", Some(Centroid::new(34.05, -118.25)), Some(1000)),
            Area::new("T2", Some(Centroid::new(34.20, -118.40)), Some(500)),
            Area::new("T3", None, Some(200)),
        ]
    }

    #[test]
    fn reference_scenario() {
        let metrics = compute_access_metrics(&facilities(), &areas(), &MetricsOptions::default());

        let distances = metrics.distances.value().unwrap();
        assert_eq!(distances.len(), 3);
        assert!(distances.get("T1").unwrap().unwrap().abs() < 1e-9);
        let t2 = distances.get("T2").unwrap().unwrap();
        assert!((t2 - 0.1_f64.hypot(0.1) * KM_PER_DEGREE).abs() < 1e-9);
        assert_eq!(distances.get("T3"), Some(None));

        let gaps = metrics.gaps.value().unwrap();
        let gap_ids: Vec<&str> = gaps.iter().map(|g| g.area.geoid.as_str()).collect();
        assert_eq!(gap_ids, ["T2"]);

        let gap_summary = metrics.gap_summary.value().unwrap();
        assert_eq!(gap_summary.count, 1);
        assert_eq!(gap_summary.affected_population, 500);

        let per_capita = metrics.per_capita.value().unwrap();
        assert_eq!(per_capita.total_facilities, 2);
        assert_eq!(per_capita.total_population, 1700);
        assert!((per_capita.per_10k - 11.76).abs() < 0.01);

        let scores = metrics.scores.value().unwrap();
        assert_eq!(scores.get("T1"), Some(100.0));
        assert_eq!(scores.get("T2"), Some(0.0));
        assert_eq!(scores.get("T3"), None);

        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.kind == NoticeKind::UndefinedCentroid)
        );
    }

    #[test]
    fn empty_category_keeps_per_capita() {
        let options = MetricsOptions {
            category: Some(FacilityCategory::UrgentCare),
            ..MetricsOptions::default()
        };

        let metrics = compute_access_metrics(&facilities(), &areas(), &options);

        assert!(!metrics.distances.is_available());
        assert!(!metrics.gaps.is_available());
        assert!(!metrics.scores.is_available());

        let per_capita = metrics.per_capita.value().unwrap();
        assert_eq!(per_capita.total_facilities, 0);
        assert_eq!(per_capita.per_10k, 0.0);

        assert!(metrics.notices.iter().any(|n| {
            n.kind == NoticeKind::EmptyFacilitySet && n.metric == MetricName::Distances
        }));
    }

    #[test]
    fn category_filter_counts_matching_facilities() {
        let options = MetricsOptions {
            category: Some(FacilityCategory::Clinic),
            ..MetricsOptions::default()
        };

        let metrics = compute_access_metrics(&facilities(), &areas(), &options);

        assert_eq!(metrics.per_capita.value().unwrap().total_facilities, 1);
        // T1 sits on the hospital, which the clinic filter excludes.
        let t1 = metrics.distances.value().unwrap().get("T1").unwrap().unwrap();
        assert!(t1 > 0.0);
    }

    #[test]
    fn zero_population_keeps_distance_metrics() {
        let areas: Vec<Area> = areas()
            .into_iter()
            .map(|mut a| {
                a.population = Some(0);
                a
            })
            .collect();

        let metrics = compute_access_metrics(&facilities(), &areas, &MetricsOptions::default());

        assert!(metrics.distances.is_available());
        assert!(metrics.scores.is_available());
        assert!(!metrics.per_capita.is_available());
        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.kind == NoticeKind::DivideByZero && n.metric == MetricName::PerCapita)
        );
    }

    #[test]
    fn missing_population_is_input_validation() {
        let mut areas = areas();
        areas[1].population = None;

        let metrics = compute_access_metrics(&facilities(), &areas, &MetricsOptions::default());

        assert!(!metrics.per_capita.is_available());
        assert!(metrics.gaps.is_available());
        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.kind == NoticeKind::InputValidation)
        );
        assert_eq!(metrics.gap_summary.value().unwrap().unknown_population, 1);
    }

    #[test]
    fn degenerate_scores_raise_notice() {
        let facilities = vec![Facility::new(FacilityCategory::Hospital, 0.0, 0.0)];
        let areas = vec![
            Area::new("N", Some(Centroid::new(0.1, 0.0)), Some(10)),
            Area::new("E", Some(Centroid::new(0.0, 0.1)), Some(10)),
        ];

        let metrics = compute_access_metrics(&facilities, &areas, &MetricsOptions::default());

        let scores = metrics.scores.value().unwrap();
        assert!(scores.degenerate);
        assert!(scores.scores.iter().all(|s| s.score == 0.0));
        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.kind == NoticeKind::DegenerateNormalization)
        );
    }

    #[test]
    fn population_overflow_only_disables_population_metrics() {
        let areas = vec![
            Area::new("T1", Some(Centroid::new(34.20, -118.40)), Some(u64::MAX)),
            Area::new("T2", Some(Centroid::new(34.30, -118.50)), Some(u64::MAX)),
        ];

        let metrics = compute_access_metrics(&facilities(), &areas, &MetricsOptions::default());

        assert!(metrics.distances.is_available());
        assert!(metrics.scores.is_available());
        assert_eq!(metrics.gaps.value().map(Vec::len), Some(2));
        assert!(!metrics.gap_summary.is_available());
        assert!(!metrics.per_capita.is_available());
        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.metric == MetricName::Gaps && n.kind == NoticeKind::InputValidation)
        );
    }

    #[test]
    fn non_finite_centroid_is_undefined_distance() {
        let areas = vec![
            Area::new("T1", Some(Centroid::new(34.05, -118.25)), Some(1000)),
            Area::new("NaN", Some(Centroid::new(f64::NAN, 1.0)), Some(10)),
        ];

        let metrics = compute_access_metrics(&facilities(), &areas, &MetricsOptions::default());

        let distances = metrics.distances.value().unwrap();
        assert_eq!(distances.get("NaN"), Some(None));
        assert_eq!(metrics.scores.value().unwrap().get("NaN"), None);
        assert!(
            metrics
                .notices
                .iter()
                .any(|n| n.kind == NoticeKind::UndefinedCentroid)
        );
    }

    #[test]
    fn missing_facility_table_marks_every_metric_unavailable() {
        let metrics =
            facilities_unavailable(&areas(), &MetricsOptions::default(), "missing column 'lat'");

        assert_eq!(metrics.area_count, 3);
        assert!(!metrics.distances.is_available());
        assert!(!metrics.gaps.is_available());
        assert!(!metrics.per_capita.is_available());
        let MetricOutcome::Unavailable { reason } = &metrics.scores else {
            panic!("scores should be unavailable");
        };
        assert!(reason.contains("missing column 'lat'"));
        assert!(
            metrics
                .notices
                .iter()
                .all(|n| n.kind == NoticeKind::InputValidation)
        );
    }
}
