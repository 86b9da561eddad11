//! Process configuration.
//!
//! All environment access happens here, once, at process start. The resulting
//! structs are passed down explicitly so no component reads ambient state on
//! its own.

use std::env;
use std::path::PathBuf;

/// Registry root directory (versioned model store).
pub const ENV_TRACKING_DIR: &str = "TRACKING_DIR";
/// Logical model name used for registration and serve-time resolution.
pub const ENV_MODEL_NAME: &str = "MODEL_NAME";
/// Explicit model artifact path; bypasses name-based resolution entirely.
pub const ENV_MODEL_URI: &str = "MODEL_URI";
/// Experiment name recorded with each training run.
pub const ENV_EXPERIMENT_NAME: &str = "EXPERIMENT_NAME";

const DEFAULT_TRACKING_DIR: &str = "./model-registry";
const DEFAULT_EXPERIMENT: &str = "forecast-demo";

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration for the training entry point.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Root directory of the file-backed registry
    pub tracking_dir: PathBuf,
    /// Default experiment name (CLI flag takes precedence)
    pub experiment: String,
    /// Default registry model name (CLI flag takes precedence)
    pub model_name: Option<String>,
}

impl TrainingConfig {
    pub fn from_env() -> Self {
        Self {
            tracking_dir: env_non_empty(ENV_TRACKING_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKING_DIR)),
            experiment: env_non_empty(ENV_EXPERIMENT_NAME)
                .unwrap_or_else(|| DEFAULT_EXPERIMENT.to_string()),
            model_name: env_non_empty(ENV_MODEL_NAME),
        }
    }
}

/// Configuration for the serving binary.
#[derive(Debug, Clone)]
pub struct ServingConfig {
    /// Root directory of the file-backed registry
    pub tracking_dir: PathBuf,
    /// Logical model name for alias/latest resolution
    pub model_name: Option<String>,
    /// Explicit artifact path; wins over name-based resolution
    pub model_uri: Option<String>,
    /// Bind host (default 0.0.0.0)
    pub host: String,
    /// Bind port (default 8080)
    pub port: u16,
}

impl ServingConfig {
    pub fn from_env() -> Self {
        Self {
            tracking_dir: env_non_empty(ENV_TRACKING_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKING_DIR)),
            model_name: env_non_empty(ENV_MODEL_NAME),
            model_uri: env_non_empty(ENV_MODEL_URI),
            host: env_non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Registry endpoint string reported by the health endpoint.
    pub fn tracking_uri(&self) -> String {
        self.tracking_dir.display().to_string()
    }
}
