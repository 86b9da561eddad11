//! Axum-based HTTP serving layer.
//!
//! The serving process loads one model at startup and exposes it over a
//! small REST surface:
//!
//! - `GET /health` (alias `/healthz`): service status, model URI, registry
//!   endpoint
//! - `POST /predict`: forecast `n_periods` steps ahead
//!
//! The loaded model handle is read-only after startup and shared across
//! concurrently handled requests.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
