//! Forecast HTTP Server Binary
//!
//! Entry point for the forecast serving REST API. It resolves the model to
//! serve (explicit URI, `prod` alias, or latest version, in that order),
//! loads the artifact, and starts serving requests. Resolution failure is
//! fatal: the service refuses to start without a loadable model.
//!
//! # Usage
//!
//! ```bash
//! # Serve the promoted version of a registered model
//! MODEL_NAME=sales-forecast cargo run --bin forecast-server
//!
//! # Pin an explicit artifact, bypassing the registry
//! MODEL_URI=/path/to/model.json cargo run --bin forecast-server
//! ```
//!
//! # Environment Variables
//!
//! - `TRACKING_DIR`: Registry root directory (default: ./model-registry)
//! - `MODEL_NAME`: Registered model name to resolve
//! - `MODEL_URI`: Explicit artifact path; wins over name-based resolution
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use forecast_pipeline::config::ServingConfig;
use forecast_pipeline::forecaster::{load_model, ModelArtifact};
use forecast_pipeline::http::{create_router, AppState};
use forecast_pipeline::registry::{resolve_model, FileRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting forecast HTTP server");

    let config = ServingConfig::from_env();
    let registry = FileRegistry::new(&config.tracking_dir)
        .map_err(|e| anyhow::anyhow!("cannot open registry: {}", e))?;

    let resolved = resolve_model(
        &registry,
        config.model_uri.as_deref(),
        config.model_name.as_deref(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("model resolution failed: {}", e))?;
    info!(uri = %resolved.uri, source = ?resolved.source, "resolved model");

    let artifact = ModelArtifact::read(Path::new(&resolved.uri))
        .map_err(|e| anyhow::anyhow!("cannot load model artifact: {}", e))?;
    let model = load_model(&artifact)
        .map_err(|e| anyhow::anyhow!("cannot reconstruct model: {}", e))?;
    info!(model = %model.describe(), "model loaded");

    let state = AppState::new(Arc::from(model), resolved.uri, config.tracking_uri());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
