//! HTTP handlers for the serving API.

use axum::{extract::State, Json};

use super::dto::{HealthResponse, PredictRequest, PredictResponse};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health (alias /healthz)
///
/// Pure read: reports the model URI and registry endpoint in effect.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        model_uri: state.model_uri.clone(),
        tracking_uri: state.tracking_uri.clone(),
    }))
}

/// POST /predict
///
/// Validates the horizon before touching the model; an invalid request never
/// invokes inference. Model failures surface as a 400 carrying the cause,
/// never as a silent empty result.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> HandlerResult<PredictResponse> {
    if request.n_periods <= 0 {
        return Err(AppError::BadRequest(
            "'n_periods' must be a positive integer".to_string(),
        ));
    }
    let n_periods = request.n_periods as usize;

    let predictions = state.model.predict(n_periods).map_err(|e| {
        AppError::Inference(format!(
            "model failed to predict with n_periods={}: {}",
            n_periods, e
        ))
    })?;

    // The contract promises exactly the requested length
    if predictions.len() != n_periods {
        return Err(AppError::Internal(format!(
            "model returned {} predictions for n_periods={}",
            predictions.len(),
            n_periods
        )));
    }

    Ok(Json(PredictResponse { predictions }))
}
