//! Versioned model store, promotion governance, and model resolution.
//!
//! The registry is the only durable resource shared between training and
//! serving. Access goes through the [`ModelRegistry`] trait so the backend
//! can be swapped; the default backend is the file-based [`FileRegistry`].
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  Training run            Serving startup        │
//! │  (register + promote)    (resolve + load)       │
//! └───────────┬───────────────────────┬────────────┘
//!             │                       │
//! ┌───────────▼───────────────────────▼────────────┐
//! │  ModelRegistry trait (async, Send + Sync)       │
//! └───────────────────────┬────────────────────────┘
//!                         │
//!             ┌───────────▼───────────┐
//!             │      FileRegistry      │
//!             │  (durable, file-based) │
//!             └───────────────────────┘
//! ```

pub mod error;
pub mod governor;
#[cfg(feature = "local-registry")]
pub mod local;
pub mod resolver;

#[cfg(all(test, feature = "local-registry"))]
#[path = "governor_tests.rs"]
mod governor_tests;

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::forecaster::ModelArtifact;

pub use error::{ErrorContext, RegistryError, RegistryResult};
pub use governor::{promote_if_better, PromotionDecision};
#[cfg(feature = "local-registry")]
pub use local::FileRegistry;
pub use resolver::{resolve_model, ResolveError, ResolvedModel, ResolvedSource};

/// The production-designated alias. Moving it is the only alias mutation this
/// system performs.
pub const PROD_ALIAS: &str = "prod";

/// Metric name recorded for every training run.
pub const SMAPE_METRIC: &str = "smape";

/// One registered model version.
///
/// Everything except alias membership is immutable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Registered model name
    pub name: String,
    /// Monotonically assigned version number, unique per name
    pub version: u64,
    /// Artifact location (filesystem path for the file backend)
    pub source: String,
    /// Originating training-run identifier
    pub run_id: String,
    /// Experiment the run belonged to
    pub experiment: Option<String>,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// SHA-256 checksum of the serialized artifact
    pub checksum: String,
    /// Metrics recorded at registration time
    pub metrics: HashMap<String, f64>,
    /// Aliases currently pointing at this version (filled in by queries)
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ModelVersion {
    /// Look up a recorded metric by name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Whether this version currently holds the given alias.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }
}

/// Run metadata supplied when registering a version.
#[derive(Debug, Clone, Default)]
pub struct VersionMeta {
    pub run_id: String,
    pub experiment: Option<String>,
    pub metrics: HashMap<String, f64>,
}

/// Alias table for one model name: alias -> version.
pub type AliasMap = BTreeMap<String, u64>;

/// Durable, versioned storage of model artifacts and their metadata.
///
/// Implementations must guarantee that alias reassignment is atomic from the
/// caller's perspective: a reader never observes the alias absent or partial
/// while it is being moved.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Persist an artifact as the next version of `name` and return the new
    /// version record. Version numbers are assigned monotonically.
    async fn create_version(
        &self,
        name: &str,
        artifact: &ModelArtifact,
        meta: VersionMeta,
    ) -> RegistryResult<ModelVersion>;

    /// All versions registered under `name`, with alias membership filled in.
    /// Returns an empty list for an unknown name.
    async fn list_versions(&self, name: &str) -> RegistryResult<Vec<ModelVersion>>;

    /// Fetch a specific version.
    async fn get_version(&self, name: &str, version: u64) -> RegistryResult<ModelVersion>;

    /// Atomically point `alias` at `version`. Fails with `NotFound` if the
    /// version does not exist.
    async fn set_alias(&self, name: &str, alias: &str, version: u64) -> RegistryResult<()>;

    /// Resolve an alias to a version number, if the alias exists.
    async fn resolve_alias(&self, name: &str, alias: &str) -> RegistryResult<Option<u64>>;

    /// Verify the backend is reachable and writable.
    async fn health_check(&self) -> RegistryResult<bool>;
}
