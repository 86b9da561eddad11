//! Core domain types for the forecasting pipeline.
//!
//! These types are constructed once per training run and treated as
//! immutable afterwards. All validation happens at construction time so the
//! rest of the pipeline can rely on their invariants.

pub mod series;


use serde::{Deserialize, Serialize};

pub use series::TimeSeries;

/// Errors raised by data loading, validation and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Too few observations for the requested operation.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    Insufficient { required: usize, actual: usize },

    /// Actual and predicted sequences have different lengths (or are empty).
    #[error("dimension mismatch: {actual} actual values vs {predicted} predicted values")]
    DimensionMismatch { actual: usize, predicted: usize },

    /// Timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing (violation at index {index})")]
    Unordered { index: usize },

    /// The cleaned dataset contains no usable rows.
    #[error("dataset is empty after cleaning")]
    Empty,

    /// A required CSV column is missing.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// CSV parsing failed at the file level.
    #[error("failed to read CSV: {0}")]
    Csv(String),

    /// Remote dataset could not be fetched.
    #[error("failed to fetch CSV from '{url}': {message}")]
    Fetch { url: String, message: String },
}

/// Sampling cadence inferred from a timestamp sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyCode {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    /// Irregular or unrecognized spacing; treated like daily data.
    Other,
}

impl FrequencyCode {
    /// Observations per full seasonal cycle for this cadence.
    ///
    /// Unrecognized cadences fall back to the daily period of 7.
    pub fn seasonal_period(self) -> usize {
        match self {
            FrequencyCode::Monthly => 12,
            FrequencyCode::Weekly => 52,
            FrequencyCode::Daily => 7,
            FrequencyCode::Hourly => 24,
            FrequencyCode::Other => 7,
        }
    }
}

impl std::fmt::Display for FrequencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FrequencyCode::Hourly => "hourly",
            FrequencyCode::Daily => "daily",
            FrequencyCode::Weekly => "weekly",
            FrequencyCode::Monthly => "monthly",
            FrequencyCode::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// Seasonal configuration derived once per training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConfig {
    /// Inferred sampling cadence
    pub frequency: FrequencyCode,
    /// Observations per seasonal cycle
    pub seasonal_period: usize,
    /// Whether seasonal modelling is enabled for this run
    pub seasonal_enabled: bool,
}

impl SeasonalConfig {
    /// Build the configuration for an inferred cadence.
    ///
    /// Seasonality is disabled for degenerate periods of 0 or 1. Given the
    /// fixed period table this never triggers today; the guard protects
    /// against future cadences with trivial cycles.
    pub fn from_frequency(frequency: FrequencyCode) -> Self {
        let seasonal_period = frequency.seasonal_period();
        Self {
            frequency,
            seasonal_period,
            seasonal_enabled: !matches!(seasonal_period, 0 | 1),
        }
    }
}

/// Holdout evaluation result for a single training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metric name, currently always `"smape"`
    pub metric: String,
    /// Metric value; non-negative, lower is better
    pub value: f64,
}

impl EvaluationResult {
    pub fn smape(value: f64) -> Self {
        Self {
            metric: "smape".to_string(),
            value,
        }
    }
}
