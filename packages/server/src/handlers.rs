//! HTTP handler functions for the care access API.
//!
//! Per-area routes return the metric's tagged outcome as exported, so a
//! metric that was unavailable for the run answers `200` with
//! `"status": "unavailable"`. Only a missing metrics file is a `404`.

use actix_web::{HttpResponse, web};
use care_access_analytics_models::MetricsDocument;
use care_access_server_models::{ApiError, ApiHealth, ApiSummary, GapQueryParams};

use crate::{AppState, METRICS_FILE};

fn not_loaded() -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(format!(
        "no metrics loaded; export {METRICS_FILE} and restart the server"
    )))
}

fn with_metrics(
    state: &AppState,
    respond: impl FnOnce(&MetricsDocument) -> HttpResponse,
) -> HttpResponse {
    state.metrics.as_ref().map_or_else(not_loaded, respond)
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics_loaded: state.metrics.is_some(),
    })
}

/// `GET /api/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    with_metrics(&state, |document| {
        HttpResponse::Ok().json(ApiSummary::from(document))
    })
}

/// `GET /api/gaps`
///
/// Returns gaps worst first, truncated to `limit` when given.
pub async fn gaps(
    state: web::Data<AppState>,
    params: web::Query<GapQueryParams>,
) -> HttpResponse {
    with_metrics(&state, |document| {
        let gaps = document.metrics.gaps.clone().map(|mut gaps| {
            if let Some(limit) = params.limit {
                gaps.truncate(limit);
            }
            gaps
        });
        HttpResponse::Ok().json(gaps)
    })
}

/// `GET /api/scores`
pub async fn scores(state: web::Data<AppState>) -> HttpResponse {
    with_metrics(&state, |document| {
        HttpResponse::Ok().json(&document.metrics.scores)
    })
}

/// `GET /api/distances`
pub async fn distances(state: web::Data<AppState>) -> HttpResponse {
    with_metrics(&state, |document| {
        HttpResponse::Ok().json(&document.metrics.distances)
    })
}
