//! Application state for the HTTP server.

use std::sync::Arc;

use crate::forecaster::FittedModel;

/// Shared application state passed to all handlers.
///
/// The model handle is immutable after startup, so it is shared across
/// request handlers without additional synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Loaded forecasting model
    pub model: Arc<dyn FittedModel>,
    /// URI the model was loaded from
    pub model_uri: String,
    /// Registry endpoint in effect
    pub tracking_uri: String,
}

impl AppState {
    pub fn new(model: Arc<dyn FittedModel>, model_uri: String, tracking_uri: String) -> Self {
        Self {
            model,
            model_uri,
            tracking_uri,
        }
    }
}
