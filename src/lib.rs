//! # Forecast Pipeline
//!
//! Training, governance and serving backend for univariate time-series
//! forecasting models.
//!
//! The crate trains a forecasting model from a CSV dataset, evaluates it on a
//! holdout split with SMAPE, registers the fitted artifact in a versioned
//! model registry, and conditionally promotes it to the `prod` alias when it
//! beats the current production model. A separate serving binary resolves the
//! promoted (or explicitly pinned) version and exposes it over a REST API.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Core domain types (`TimeSeries`, `SeasonalConfig`)
//! - [`data`]: CSV loading and cleaning
//! - [`pipeline`]: Frequency inference, dataset splitting, holdout
//!   evaluation, and training-run orchestration
//! - [`forecaster`]: The opaque fit/predict capability and its built-in
//!   exponential-smoothing model search
//! - [`registry`]: Versioned model store, promotion governor, and serve-time
//!   model resolution
//! - [`http`]: Axum-based serving endpoints
//!
//! Training and serving are independent processes; the registry is the only
//! durable state shared between them.

pub mod config;
pub mod data;
pub mod forecaster;
pub mod models;
pub mod pipeline;
pub mod registry;

#[cfg(feature = "http-server")]
pub mod http;
