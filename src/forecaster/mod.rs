//! Opaque forecasting capability.
//!
//! The statistical method behind training is an external, swappable
//! dependency as far as the pipeline is concerned: it only needs
//! `fit(series, config) -> FittedModel` and `FittedModel::predict(n)`. Those
//! seams are the [`Forecaster`] and [`FittedModel`] traits. The built-in
//! implementation in [`smoothing`] performs an automatic search over the
//! exponential-smoothing family.

pub mod smoothing;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::SeasonalConfig;

pub use smoothing::AutoSmoothing;

/// Model search failed; fatal for the training run.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("insufficient training data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no candidate model produced a finite validation score")]
    NoViableModel,
}

/// Model failed while producing a forecast.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("n_periods must be a positive integer")]
    EmptyHorizon,

    #[error("model produced a non-finite forecast at step {step}")]
    NonFinite { step: usize },
}

/// Artifact encoding or decoding failed.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cannot read artifact '{path}': {message}")]
    Io { path: String, message: String },

    #[error("unknown model flavor '{0}'")]
    UnknownFlavor(String),
}

/// A fitted forecasting model.
///
/// Implementations must be safe for concurrent read-only inference; the
/// serving layer shares one handle across request handlers without locking.
pub trait FittedModel: Send + Sync {
    /// Forecast the next `n_periods` values.
    fn predict(&self, n_periods: usize) -> Result<Vec<f64>, InferenceError>;

    /// Serialize this model into a durable artifact.
    fn artifact(&self) -> Result<ModelArtifact, ArtifactError>;

    /// Short human-readable description (model family and parameters).
    fn describe(&self) -> String;
}

/// A model-search capability: training series in, fitted model out.
pub trait Forecaster: Send + Sync {
    fn fit(
        &self,
        series: &[f64],
        config: &SeasonalConfig,
    ) -> Result<Box<dyn FittedModel>, SearchError>;
}

/// Self-describing serialized model.
///
/// The `flavor` field selects the deserializer at load time, so the serving
/// process needs no out-of-band knowledge of what was trained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub flavor: String,
    pub payload: serde_json::Value,
}

impl ModelArtifact {
    /// Encode to the canonical on-disk representation.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Read an artifact file from disk.
    pub fn read(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Reconstruct a fitted model from its artifact.
pub fn load_model(artifact: &ModelArtifact) -> Result<Box<dyn FittedModel>, ArtifactError> {
    match artifact.flavor.as_str() {
        smoothing::FLAVOR => {
            let model: smoothing::SmoothingModel =
                serde_json::from_value(artifact.payload.clone())?;
            Ok(Box::new(model))
        }
        other => Err(ArtifactError::UnknownFlavor(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrequencyCode, SeasonalConfig};

    #[test]
    fn test_artifact_round_trip_through_load_model() {
        let config = SeasonalConfig::from_frequency(FrequencyCode::Daily);
        let data: Vec<f64> = (0..40).map(|i| 10.0 + i as f64 * 0.5).collect();
        let fitted = AutoSmoothing::default().fit(&data, &config).unwrap();

        let artifact = fitted.artifact().unwrap();
        assert_eq!(artifact.flavor, smoothing::FLAVOR);

        let reloaded = load_model(&artifact).unwrap();
        assert_eq!(fitted.predict(5).unwrap(), reloaded.predict(5).unwrap());
    }

    #[test]
    fn test_unknown_flavor_rejected() {
        let artifact = ModelArtifact {
            flavor: "prophet".to_string(),
            payload: serde_json::json!({}),
        };
        assert!(matches!(
            load_model(&artifact),
            Err(ArtifactError::UnknownFlavor(_))
        ));
    }
}
