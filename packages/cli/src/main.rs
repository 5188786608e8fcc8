#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the care access metrics engine.
//!
//! Loads the facility and area tables, computes access metrics, and either
//! prints them or exports them for the server and downstream tools.
//!
//! Uses `indicatif-log-bridge` (via [`care_access_cli_utils::init_logger`])
//! so log lines and the distance progress bar share the terminal cleanly.

mod config;
mod export;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use care_access_analytics::facilities_unavailable;
use care_access_analytics::metrics::compute_access_metrics_with_progress;
use care_access_analytics::report::{render_gap_table, render_summary_report};
use care_access_analytics_models::{AccessMetrics, MetricOutcome};
use care_access_cli_utils::{IndicatifProgress, MultiProgress};
use care_access_facility_models::FacilityCategory;
use care_access_ingest::{clean_facilities, load_areas, load_facilities, write_facilities};
use clap::{Args, Parser, Subcommand};

use crate::config::AccessConfig;

#[derive(Parser)]
#[command(name = "care_access", about = "Healthcare access metrics")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Config file (defaults to `care_access.toml` when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Facility CSV (overrides the config file)
    #[arg(long, global = true)]
    facilities: Option<PathBuf>,
    /// Area CSV (overrides the config file)
    #[arg(long, global = true)]
    areas: Option<PathBuf>,
    /// Only measure access to this facility category (e.g. `urgent_care`)
    #[arg(long, global = true)]
    category: Option<FacilityCategory>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary report
    Report,
    /// Print underserved areas, worst first
    Gaps {
        /// Gap threshold in kilometers (overrides the config file)
        #[arg(long)]
        threshold: Option<f64>,
        /// Maximum number of gaps to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write metrics JSON, per-area CSVs, and gap `GeoJSON` to the output directory
    Export {
        /// Output directory (overrides the config file)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Drop out-of-bounds and duplicate facilities from a raw facility CSV
    Clean {
        /// Raw facility CSV
        #[arg(long)]
        input: PathBuf,
        /// Where to write the cleaned CSV
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = care_access_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = AccessConfig::load(cli.common.config.as_deref())?;
    if let Some(facilities) = cli.common.facilities {
        config.facilities = facilities;
    }
    if let Some(areas) = cli.common.areas {
        config.areas = areas;
    }
    if let Some(category) = cli.common.category {
        config.category = Some(category);
    }

    match cli.command {
        Commands::Report => {
            let metrics = compute(&config, &multi)?;
            print!("{}", render_summary_report(&metrics));
        }
        Commands::Gaps { threshold, limit } => {
            if let Some(threshold) = threshold {
                config.threshold_km = threshold;
            }
            let metrics = compute(&config, &multi)?;
            match &metrics.gaps {
                MetricOutcome::Available { value } => {
                    println!(
                        "{} area(s) farther than {} km from a facility",
                        value.len(),
                        config.threshold_km
                    );
                    print!("{}", render_gap_table(value, limit));
                }
                MetricOutcome::Unavailable { reason } => {
                    println!("Gaps unavailable: {reason}");
                }
            }
        }
        Commands::Export { output_dir } => {
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            let metrics = compute(&config, &multi)?;
            let written = export::export_all(&metrics, &config.output_dir)?;
            println!(
                "Exported {} file(s) to {}",
                written.len(),
                config.output_dir.display()
            );
        }
        Commands::Clean { input, output } => {
            let loaded = load_facilities(&input)?;
            if config.bounds.is_none() {
                log::warn!("No [bounds] configured; only removing duplicates");
            }
            let (facilities, report) = clean_facilities(loaded.records, config.bounds.as_ref());
            write_facilities(BufWriter::new(File::create(&output)?), &facilities)?;
            println!(
                "Kept {} of {} facilities ({} out of bounds, {} duplicates) -> {}",
                report.kept,
                report.kept + report.out_of_bounds + report.duplicates,
                report.out_of_bounds,
                report.duplicates,
                output.display()
            );
        }
    }

    Ok(())
}

/// Loads both tables and computes every metric, with a progress bar over
/// the per-area distance queries.
///
/// An unreadable facility table marks every metric unavailable instead of
/// failing the run; an unreadable area table is still fatal.
fn compute(
    config: &AccessConfig,
    multi: &MultiProgress,
) -> Result<AccessMetrics, Box<dyn std::error::Error>> {
    let options = config.metrics_options()?;
    let areas = load_areas(&config.areas)?;
    let facilities = match load_facilities(&config.facilities) {
        Ok(facilities) => facilities,
        Err(e) => {
            log::error!("Failed to load facilities from {}: {e}", config.facilities.display());
            return Ok(facilities_unavailable(&areas.records, &options, &e.to_string()));
        }
    };

    let progress = IndicatifProgress::areas_bar(multi, "Measuring nearest-facility distances");
    Ok(compute_access_metrics_with_progress(
        &facilities.records,
        &areas.records,
        &options,
        progress.as_ref(),
    ))
}
