//! Forecast accuracy metrics.

use crate::models::DataError;

/// Guard against division by zero when both actual and predicted are zero.
pub const SMAPE_EPSILON: f64 = 1e-8;

/// Symmetric Mean Absolute Percentage Error.
///
/// `smape = (1/H) * Σ 2|a_i - p_i| / (|a_i| + |p_i| + ε)`
///
/// Non-negative, lower is better, and exactly zero when the sequences match.
/// Fails with [`DataError::DimensionMismatch`] when the sequences differ in
/// length or are empty.
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64, DataError> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(DataError::DimensionMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| 2.0 * (a - p).abs() / (a.abs() + p.abs() + SMAPE_EPSILON))
        .sum();

    Ok(sum / actual.len() as f64)
}
