//! Exponential-smoothing model family and automatic order search.
//!
//! Three variants cover the usual shapes of univariate series:
//!
//! - **Simple (SES)**: no trend, no seasonality; flat forecasts
//! - **Holt**: linear trend
//! - **Holt-Winters (additive)**: trend plus seasonality
//!
//! [`AutoSmoothing`] grid-searches parameters for all applicable variants,
//! scores each candidate on a validation tail of the training series, and
//! refits the winner on the full series.

use serde::{Deserialize, Serialize};

use super::{ArtifactError, FittedModel, Forecaster, InferenceError, ModelArtifact, SearchError};
use crate::models::SeasonalConfig;
use crate::pipeline::metrics::smape;

/// Artifact flavor identifier for this model family.
pub const FLAVOR: &str = "smoothing";

/// A fitted exponential-smoothing model with its terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingModel {
    Simple {
        alpha: f64,
        level: f64,
    },
    Holt {
        alpha: f64,
        beta: f64,
        level: f64,
        trend: f64,
    },
    HoltWinters {
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
        level: f64,
        trend: f64,
        seasonal: Vec<f64>,
        /// Number of observations consumed during fitting; anchors the
        /// seasonal index for out-of-sample forecasts.
        origin: usize,
    },
}

impl SmoothingModel {
    fn fit_simple(data: &[f64], alpha: f64) -> Result<Self, SearchError> {
        if data.len() < 2 {
            return Err(SearchError::InsufficientData {
                required: 2,
                actual: data.len(),
            });
        }

        let mut level = data[0];
        for &value in &data[1..] {
            level = alpha * value + (1.0 - alpha) * level;
        }
        Ok(SmoothingModel::Simple { alpha, level })
    }

    fn fit_holt(data: &[f64], alpha: f64, beta: f64) -> Result<Self, SearchError> {
        if data.len() < 3 {
            return Err(SearchError::InsufficientData {
                required: 3,
                actual: data.len(),
            });
        }

        let mut level = data[0];
        let mut trend = data[1] - data[0];
        for &value in &data[1..] {
            let prev_level = level;
            level = alpha * value + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }
        Ok(SmoothingModel::Holt {
            alpha,
            beta,
            level,
            trend,
        })
    }

    fn fit_holt_winters(
        data: &[f64],
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
    ) -> Result<Self, SearchError> {
        if period < 2 {
            return Err(SearchError::InvalidParameter {
                name: "period".to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        let required = 2 * period;
        if data.len() < required {
            return Err(SearchError::InsufficientData {
                required,
                actual: data.len(),
            });
        }

        // Initialize level from the first season, trend from the first two
        let mut level = data[..period].iter().sum::<f64>() / period as f64;
        let second: f64 = data[period..2 * period].iter().sum::<f64>() / period as f64;
        let mut trend = (second - level) / period as f64;
        let mut seasonal: Vec<f64> = data[..period].iter().map(|v| v - level).collect();

        for (i, &value) in data.iter().enumerate().skip(period) {
            let idx = i % period;
            let prev_level = level;
            let prev_seasonal = seasonal[idx];

            level = alpha * (value - prev_seasonal) + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
            seasonal[idx] = gamma * (value - level) + (1.0 - gamma) * prev_seasonal;
        }

        Ok(SmoothingModel::HoltWinters {
            alpha,
            beta,
            gamma,
            period,
            level,
            trend,
            seasonal,
            origin: data.len(),
        })
    }

    fn forecast(&self, n_periods: usize) -> Vec<f64> {
        match self {
            SmoothingModel::Simple { level, .. } => vec![*level; n_periods],
            SmoothingModel::Holt { level, trend, .. } => (1..=n_periods)
                .map(|h| level + h as f64 * trend)
                .collect(),
            SmoothingModel::HoltWinters {
                period,
                level,
                trend,
                seasonal,
                origin,
                ..
            } => (1..=n_periods)
                .map(|h| {
                    let idx = (origin + h - 1) % period;
                    level + h as f64 * trend + seasonal[idx]
                })
                .collect(),
        }
    }
}

impl FittedModel for SmoothingModel {
    fn predict(&self, n_periods: usize) -> Result<Vec<f64>, InferenceError> {
        if n_periods == 0 {
            return Err(InferenceError::EmptyHorizon);
        }

        let forecasts = self.forecast(n_periods);
        if let Some(step) = forecasts.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite { step });
        }
        Ok(forecasts)
    }

    fn artifact(&self) -> Result<ModelArtifact, ArtifactError> {
        Ok(ModelArtifact {
            flavor: FLAVOR.to_string(),
            payload: serde_json::to_value(self)?,
        })
    }

    fn describe(&self) -> String {
        match self {
            SmoothingModel::Simple { alpha, .. } => format!("SES(alpha={:.2})", alpha),
            SmoothingModel::Holt { alpha, beta, .. } => {
                format!("Holt(alpha={:.2}, beta={:.2})", alpha, beta)
            }
            SmoothingModel::HoltWinters {
                alpha,
                beta,
                gamma,
                period,
                ..
            } => format!(
                "HoltWinters(alpha={:.2}, beta={:.2}, gamma={:.2}, period={})",
                alpha, beta, gamma, period
            ),
        }
    }
}

/// Candidate parameterization evaluated by the search.
#[derive(Debug, Clone, Copy)]
enum Candidate {
    Simple { alpha: f64 },
    Holt { alpha: f64, beta: f64 },
    HoltWinters { alpha: f64, beta: f64, gamma: f64 },
}

impl Candidate {
    fn fit(&self, data: &[f64], period: usize) -> Result<SmoothingModel, SearchError> {
        match *self {
            Candidate::Simple { alpha } => SmoothingModel::fit_simple(data, alpha),
            Candidate::Holt { alpha, beta } => SmoothingModel::fit_holt(data, alpha, beta),
            Candidate::HoltWinters { alpha, beta, gamma } => {
                SmoothingModel::fit_holt_winters(data, alpha, beta, gamma, period)
            }
        }
    }
}

/// Automatic model search over the smoothing family.
///
/// Candidates are fitted on the leading portion of the training series and
/// scored by SMAPE against a validation tail; the best-scoring candidate is
/// refitted on the full series. Seasonal candidates only enter the grid when
/// the run's [`SeasonalConfig`] enables them and the data covers two full
/// cycles.
#[derive(Debug, Clone, Default)]
pub struct AutoSmoothing;

/// Fraction of the training series held back to score candidates.
const VALIDATION_FRACTION: f64 = 0.2;

impl AutoSmoothing {
    fn candidates(config: &SeasonalConfig, fit_len: usize) -> Vec<Candidate> {
        let mut grid = Vec::new();

        for i in 1..10 {
            grid.push(Candidate::Simple {
                alpha: i as f64 / 10.0,
            });
        }
        for &alpha in &[0.2, 0.4, 0.6, 0.8] {
            for &beta in &[0.05, 0.1, 0.2] {
                grid.push(Candidate::Holt { alpha, beta });
            }
        }
        if config.seasonal_enabled && fit_len >= 2 * config.seasonal_period {
            for &alpha in &[0.2, 0.4, 0.6] {
                for &gamma in &[0.1, 0.3] {
                    grid.push(Candidate::HoltWinters {
                        alpha,
                        beta: 0.1,
                        gamma,
                    });
                }
            }
        }
        grid
    }
}

impl Forecaster for AutoSmoothing {
    fn fit(
        &self,
        series: &[f64],
        config: &SeasonalConfig,
    ) -> Result<Box<dyn FittedModel>, SearchError> {
        if series.len() < 4 {
            return Err(SearchError::InsufficientData {
                required: 4,
                actual: series.len(),
            });
        }

        let val_len = ((series.len() as f64 * VALIDATION_FRACTION) as usize).max(1);
        let fit_len = series.len() - val_len;
        let (fit_part, val_part) = series.split_at(fit_len);

        let mut best: Option<(Candidate, f64)> = None;
        for candidate in Self::candidates(config, fit_len) {
            let Ok(model) = candidate.fit(fit_part, config.seasonal_period) else {
                continue;
            };
            let Ok(forecasts) = model.predict(val_len) else {
                continue;
            };
            let Ok(score) = smape(val_part, &forecasts) else {
                continue;
            };
            if score.is_finite() && best.map_or(true, |(_, s)| score < s) {
                best = Some((candidate, score));
            }
        }

        let (winner, _) = best.ok_or(SearchError::NoViableModel)?;
        let model = winner.fit(series, config.seasonal_period)?;
        Ok(Box::new(model))
    }
}
