//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Number of future periods to forecast; must be a positive integer
    pub n_periods: i64,
}

/// Response body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Forecast values, exactly `n_periods` entries
    pub predictions: Vec<f64>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// URI of the loaded model
    pub model_uri: String,
    /// Registry endpoint in effect
    pub tracking_uri: String,
}
