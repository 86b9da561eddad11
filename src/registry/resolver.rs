//! Serve-time model resolution.
//!
//! Invoked once at service start (or on explicit reload). The fallback order
//! keeps a freshly trained model servable before its first promotion, while
//! a production deployment normally pins to the curated `prod` alias:
//!
//! 1. explicit model URI, used verbatim;
//! 2. the `(name, "prod")` alias;
//! 3. the highest registered version ("latest");
//! 4. otherwise resolution fails and the service refuses to start.

use super::error::RegistryError;
use super::{ModelRegistry, PROD_ALIAS};

/// Resolution failed; fatal at service startup.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no versions registered for model '{0}'")]
    NoVersions(String),

    #[error("either an explicit model URI or a model name is required")]
    MissingIdentifier,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Which branch of the fallback order produced the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSource {
    Explicit,
    ProdAlias { version: u64 },
    Latest { version: u64 },
}

/// A loadable model artifact location.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub uri: String,
    pub source: ResolvedSource,
}

/// Resolve the model to serve.
pub async fn resolve_model(
    registry: &dyn ModelRegistry,
    explicit_uri: Option<&str>,
    model_name: Option<&str>,
) -> Result<ResolvedModel, ResolveError> {
    if let Some(uri) = explicit_uri {
        return Ok(ResolvedModel {
            uri: uri.to_string(),
            source: ResolvedSource::Explicit,
        });
    }

    let name = model_name.ok_or(ResolveError::MissingIdentifier)?;

    if let Some(version) = registry.resolve_alias(name, PROD_ALIAS).await? {
        let record = registry.get_version(name, version).await?;
        return Ok(ResolvedModel {
            uri: record.source,
            source: ResolvedSource::ProdAlias { version },
        });
    }

    let versions = registry.list_versions(name).await?;
    let latest = versions
        .into_iter()
        .max_by_key(|v| v.version)
        .ok_or_else(|| ResolveError::NoVersions(name.to_string()))?;
    Ok(ResolvedModel {
        uri: latest.source,
        source: ResolvedSource::Latest {
            version: latest.version,
        },
    })
}

#[cfg(all(test, feature = "local-registry"))]
mod tests {
    use super::*;
    use crate::forecaster::ModelArtifact;
    use crate::registry::{FileRegistry, VersionMeta};
    use std::collections::HashMap;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            flavor: "smoothing".to_string(),
            payload: serde_json::json!({"kind": "simple", "alpha": 0.5, "level": 1.0}),
        }
    }

    async fn seeded_registry(dir: &std::path::Path, versions: usize) -> FileRegistry {
        let registry = FileRegistry::new(dir).unwrap();
        for i in 0..versions {
            let meta = VersionMeta {
                run_id: format!("run-{}", i),
                experiment: None,
                metrics: HashMap::new(),
            };
            registry
                .create_version("sales", &artifact(), meta)
                .await
                .unwrap();
        }
        registry
    }

    #[tokio::test]
    async fn test_explicit_uri_wins() {
        let dir = tempfile::tempdir().unwrap();
        let registry = seeded_registry(dir.path(), 2).await;
        registry.set_alias("sales", PROD_ALIAS, 1).await.unwrap();

        let resolved = resolve_model(&registry, Some("/pinned/model.json"), Some("sales"))
            .await
            .unwrap();
        assert_eq!(resolved.uri, "/pinned/model.json");
        assert_eq!(resolved.source, ResolvedSource::Explicit);
    }

    #[tokio::test]
    async fn test_prod_alias_preferred_over_latest() {
        let dir = tempfile::tempdir().unwrap();
        let registry = seeded_registry(dir.path(), 3).await;
        registry.set_alias("sales", PROD_ALIAS, 1).await.unwrap();

        let resolved = resolve_model(&registry, None, Some("sales")).await.unwrap();
        assert_eq!(resolved.source, ResolvedSource::ProdAlias { version: 1 });
    }

    #[tokio::test]
    async fn test_no_alias_falls_back_to_latest() {
        let dir = tempfile::tempdir().unwrap();
        let registry = seeded_registry(dir.path(), 3).await;

        let resolved = resolve_model(&registry, None, Some("sales")).await.unwrap();
        assert_eq!(resolved.source, ResolvedSource::Latest { version: 3 });
    }

    #[tokio::test]
    async fn test_no_versions_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let registry = seeded_registry(dir.path(), 0).await;

        let err = resolve_model(&registry, None, Some("sales")).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoVersions(_)));
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let registry = seeded_registry(dir.path(), 0).await;

        let err = resolve_model(&registry, None, None).await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingIdentifier));
    }
}
