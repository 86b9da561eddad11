//! Training-run orchestration.
//!
//! One training run proceeds strictly sequentially: frequency inference,
//! train/test split, model search, holdout evaluation, then (optionally)
//! registration and governed promotion. Data and model-search failures are
//! fatal; registry failures after a successful fit degrade to warnings so a
//! governance hiccup never discards a valid training result.

pub mod frequency;
pub mod metrics;
pub mod split;

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::forecaster::{Forecaster, InferenceError, SearchError};
use crate::models::{DataError, EvaluationResult, SeasonalConfig, TimeSeries};
use crate::registry::{
    promote_if_better, ModelRegistry, PromotionDecision, VersionMeta, SMAPE_METRIC,
};

pub use frequency::infer_frequency;
pub use metrics::smape;
pub use split::train_test_split;

/// Fatal training-run errors. Registry problems are deliberately absent:
/// they surface as warnings inside [`TrainingReport`].
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("holdout prediction failed: {0}")]
    Evaluation(#[from] InferenceError),
}

/// Per-run options, typically derived from CLI flags.
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    /// Forecast horizon the model is intended for (recorded, not used by the
    /// holdout evaluation, which always scores the full test suffix)
    pub horizon: usize,
    /// Experiment name recorded with the run
    pub experiment: Option<String>,
    /// Registry model name; `None` disables registration and promotion
    pub model_name: Option<String>,
    /// When false, register the version but never move the `prod` alias
    pub promote: bool,
}

/// What happened to the candidate in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationStatus {
    /// No model name configured; registration and promotion skipped entirely.
    Disabled,
    /// Registration failed; the run still succeeded with this warning.
    Failed { warning: String },
    /// Version registered; promotion outcome attached.
    Registered {
        version: u64,
        promotion: PromotionStatus,
    },
}

/// What happened to the `prod` alias.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionStatus {
    /// Promotion disabled via `--no-promote`.
    Disabled,
    /// The alias was moved to the candidate.
    Promoted,
    /// The governor kept the incumbent.
    Skipped { reason: String },
    /// The promotion step failed; recoverable, alias unchanged.
    Failed { warning: String },
}

/// Result of one complete training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub run_id: String,
    pub seasonal: SeasonalConfig,
    pub train_len: usize,
    pub test_len: usize,
    pub evaluation: EvaluationResult,
    pub model_summary: String,
    pub registration: RegistrationStatus,
}

/// Execute a full training run on an already-loaded series.
pub async fn run_training(
    series: &TimeSeries,
    options: &TrainingOptions,
    forecaster: &dyn Forecaster,
    registry: Option<&dyn ModelRegistry>,
) -> Result<TrainingReport, TrainingError> {
    let run_id = Uuid::new_v4().to_string();

    let seasonal = infer_frequency(series.timestamps())?;
    info!(
        frequency = %seasonal.frequency,
        seasonal_period = seasonal.seasonal_period,
        seasonal_enabled = seasonal.seasonal_enabled,
        "inferred sampling cadence"
    );

    let (train, test) = train_test_split(series)?;
    info!(train_len = train.len(), test_len = test.len(), "split dataset");

    let model = forecaster.fit(train.values(), &seasonal)?;
    let model_summary = model.describe();
    info!(model = %model_summary, horizon = options.horizon, "model search complete");

    let predictions = model.predict(test.len())?;
    let score = smape(test.values(), &predictions)?;
    let evaluation = EvaluationResult::smape(score);
    info!(smape = score, "holdout evaluation complete");

    let registration = match (&options.model_name, registry) {
        (Some(name), Some(registry)) => {
            register_and_promote(registry, name, &run_id, options, model.as_ref(), score).await
        }
        _ => RegistrationStatus::Disabled,
    };

    Ok(TrainingReport {
        run_id,
        seasonal,
        train_len: train.len(),
        test_len: test.len(),
        evaluation,
        model_summary,
        registration,
    })
}

/// Registration is unconditional for audit history; only the alias move is
/// governed. Every failure on this path is reported as a warning, never as a
/// training-run error.
async fn register_and_promote(
    registry: &dyn ModelRegistry,
    name: &str,
    run_id: &str,
    options: &TrainingOptions,
    model: &dyn crate::forecaster::FittedModel,
    score: f64,
) -> RegistrationStatus {
    let artifact = match model.artifact() {
        Ok(artifact) => artifact,
        Err(e) => {
            let warning = format!("artifact serialization failed: {}", e);
            warn!(model = name, "{}", warning);
            return RegistrationStatus::Failed { warning };
        }
    };

    let meta = VersionMeta {
        run_id: run_id.to_string(),
        experiment: options.experiment.clone(),
        metrics: HashMap::from([(SMAPE_METRIC.to_string(), score)]),
    };

    let candidate = match registry.create_version(name, &artifact, meta).await {
        Ok(candidate) => candidate,
        Err(e) => {
            let warning = format!("model registry step failed or unavailable: {}", e);
            warn!(model = name, "{}", warning);
            return RegistrationStatus::Failed { warning };
        }
    };
    info!(model = name, version = candidate.version, "registered model version");

    let promotion = if !options.promote {
        PromotionStatus::Disabled
    } else {
        match promote_if_better(registry, &candidate, score).await {
            Ok(PromotionDecision::PromoteBootstrap)
            | Ok(PromotionDecision::PromoteBetter { .. }) => PromotionStatus::Promoted,
            Ok(PromotionDecision::SkipNotBetter {
                candidate,
                incumbent,
            }) => PromotionStatus::Skipped {
                reason: format!(
                    "candidate SMAPE {:.4} is not strictly better than incumbent {:.4}",
                    candidate, incumbent
                ),
            },
            Ok(PromotionDecision::SkipMissingBaseline { incumbent_version }) => {
                PromotionStatus::Skipped {
                    reason: format!(
                        "incumbent prod version {} has no recorded SMAPE",
                        incumbent_version
                    ),
                }
            }
            Err(e) => {
                let warning = format!("promotion step failed or unavailable: {}", e);
                warn!(model = name, "{}", warning);
                PromotionStatus::Failed { warning }
            }
        }
    };

    RegistrationStatus::Registered {
        version: candidate.version,
        promotion,
    }
}
