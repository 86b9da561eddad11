//! Forecast Training Binary
//!
//! Batch-trains a forecasting model from a CSV dataset, evaluates it on a
//! holdout split, and registers/promotes it in the model registry.
//!
//! Exit behavior: data-load and model-search failures exit non-zero; a
//! registry or promotion failure after a successful fit is logged as a
//! warning and the process still exits zero.

use std::env;

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use forecast_pipeline::config::TrainingConfig;
use forecast_pipeline::data;
use forecast_pipeline::forecaster::AutoSmoothing;
use forecast_pipeline::pipeline::{
    run_training, PromotionStatus, RegistrationStatus, TrainingOptions,
};
use forecast_pipeline::registry::{FileRegistry, ModelRegistry};

/// Batch-train a forecasting model and register it
#[derive(Debug, Parser)]
#[command(name = "forecast-train")]
struct Args {
    /// Path or URL to a CSV with columns 'ds' (date) and 'y' (numeric)
    #[arg(long)]
    csv: String,

    /// Forecast horizon (steps)
    #[arg(long, default_value_t = 30)]
    horizon: usize,

    /// Experiment name recorded with the run
    #[arg(long)]
    experiment: Option<String>,

    /// Registry model name; omit to disable registration and promotion
    #[arg(long)]
    model_name: Option<String>,

    /// Register the model but never move the prod alias
    #[arg(long)]
    no_promote: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = TrainingConfig::from_env();

    let experiment = args.experiment.unwrap_or_else(|| config.experiment.clone());
    let model_name = args.model_name.or_else(|| config.model_name.clone());

    info!(tracking_dir = %config.tracking_dir.display(), "registry root");
    info!(experiment = %experiment, "experiment");
    if let Some(name) = &model_name {
        info!(model_name = %name, "registry model name");
    }

    info!(source = %args.csv, "loading data");
    let series = data::load_series(&args.csv)
        .await
        .map_err(|e| anyhow::anyhow!("data load failed: {}", e))?;
    info!(rows = series.len(), "loaded series");

    // A broken registry must not fail the run; training proceeds without it
    let registry = match FileRegistry::new(&config.tracking_dir) {
        Ok(registry) => Some(registry),
        Err(e) => {
            warn!("model registry unavailable, training without registration: {}", e);
            None
        }
    };

    let options = TrainingOptions {
        horizon: args.horizon,
        experiment: Some(experiment),
        model_name,
        promote: !args.no_promote,
    };

    let report = run_training(
        &series,
        &options,
        &AutoSmoothing,
        registry.as_ref().map(|r| r as &dyn ModelRegistry),
    )
    .await
    .map_err(|e| anyhow::anyhow!("training failed: {}", e))?;

    info!(
        run_id = %report.run_id,
        model = %report.model_summary,
        smape = report.evaluation.value,
        "training run complete"
    );

    match &report.registration {
        RegistrationStatus::Disabled => {
            info!("registration disabled (no model name configured)");
        }
        RegistrationStatus::Failed { warning } => {
            warn!("model not registered: {}", warning);
        }
        RegistrationStatus::Registered { version, promotion } => {
            info!(version, "model version registered");
            match promotion {
                PromotionStatus::Disabled => info!("promotion disabled (--no-promote)"),
                PromotionStatus::Promoted => info!(version, "version now holds the prod alias"),
                PromotionStatus::Skipped { reason } => info!("promotion skipped: {}", reason),
                PromotionStatus::Failed { warning } => warn!("promotion failed: {}", warning),
            }
        }
    }

    Ok(())
}
