#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only Actix-Web API server for exported care access metrics.
//!
//! Loads the `access_metrics.json` written by `care_access export` once at
//! startup and serves it as JSON, alongside the raw export files under
//! `/outputs`. Nothing is recomputed per request.

mod handlers;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use care_access_analytics_models::MetricsDocument;
use thiserror::Error;

/// File name of the exported metrics document inside the output directory.
pub const METRICS_FILE: &str = "access_metrics.json";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid metrics file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shared application state.
pub struct AppState {
    /// Directory holding the export files.
    pub output_dir: PathBuf,
    /// Exported metrics, if the directory had any.
    pub metrics: Option<MetricsDocument>,
}

impl AppState {
    /// Loads [`METRICS_FILE`] from `output_dir`. A missing file leaves
    /// [`Self::metrics`] empty so the server can still start.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(output_dir: impl Into<PathBuf>) -> Result<Self, ServerError> {
        let output_dir = output_dir.into();
        let path = output_dir.join(METRICS_FILE);

        let metrics = if path.is_file() {
            let document = read_metrics(&path)?;
            log::info!(
                "Loaded metrics for {} areas from {} (generated {})",
                document.metrics.area_count,
                path.display(),
                document.generated_at
            );
            Some(document)
        } else {
            log::warn!(
                "{} not found; run `care_access export` first. Metric routes will return 404",
                path.display()
            );
            None
        };

        Ok(Self {
            output_dir,
            metrics,
        })
    }
}

fn read_metrics(path: &Path) -> Result<MetricsDocument, ServerError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary))
            .route("/gaps", web::get().to(handlers::gaps))
            .route("/scores", web::get().to(handlers::scores))
            .route("/distances", web::get().to(handlers::distances)),
    );
}

/// Runs the server until it is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn run(state: AppState, bind_addr: &str, port: u16) -> std::io::Result<()> {
    let output_dir = state.output_dir.clone();
    let state = web::Data::new(state);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/outputs", &output_dir).show_files_listing())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
