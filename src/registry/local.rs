//! File-backed registry implementation.
//!
//! Layout under the registry root:
//!
//! ```text
//! <root>/<model-name>/versions/<v>/model.json   artifact
//! <root>/<model-name>/versions/<v>/meta.json    version metadata
//! <root>/<model-name>/aliases.json              alias -> version table
//! ```
//!
//! Writers are serialized with an in-process mutex; the alias table is
//! replaced via write-temp-then-rename so readers never observe a missing or
//! partially written file. Filesystem errors surface as
//! [`RegistryError::Unavailable`] so callers can degrade gracefully.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::error::{ErrorContext, RegistryError, RegistryResult};
use super::{AliasMap, ModelRegistry, ModelVersion, VersionMeta};
use crate::forecaster::ModelArtifact;

const ARTIFACT_FILE: &str = "model.json";
const META_FILE: &str = "meta.json";
const ALIASES_FILE: &str = "aliases.json";

/// Durable file-based model registry.
pub struct FileRegistry {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRegistry {
    /// Open (or create) a registry rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> RegistryResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            RegistryError::unavailable_with_context(
                format!("cannot create registry root '{}': {}", root.display(), e),
                ErrorContext::new("new"),
            )
        })?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn model_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn versions_dir(&self, name: &str) -> PathBuf {
        self.model_dir(name).join("versions")
    }

    fn version_dir(&self, name: &str, version: u64) -> PathBuf {
        self.versions_dir(name).join(version.to_string())
    }

    fn read_aliases(&self, name: &str) -> RegistryResult<AliasMap> {
        let path = self.model_dir(name).join(ALIASES_FILE);
        match fs::read(&path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AliasMap::new()),
            Err(e) => Err(unavailable("read_aliases", name, e)),
        }
    }

    /// Replace the alias table atomically (temp file + rename).
    fn write_aliases(&self, name: &str, aliases: &AliasMap) -> RegistryResult<()> {
        let dir = self.model_dir(name);
        let tmp = dir.join(format!(".{}.tmp", ALIASES_FILE));
        let path = dir.join(ALIASES_FILE);

        let bytes = serde_json::to_vec_pretty(aliases)?;
        fs::write(&tmp, bytes).map_err(|e| unavailable("write_aliases", name, e))?;
        fs::rename(&tmp, &path).map_err(|e| unavailable("write_aliases", name, e))?;
        Ok(())
    }

    fn read_meta(&self, name: &str, version: u64) -> RegistryResult<ModelVersion> {
        let path = self.version_dir(name, version).join(META_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::not_found_with_context(
                    format!("model '{}' version {} does not exist", name, version),
                    ErrorContext::new("get_version")
                        .with_model(name)
                        .with_version(version),
                ));
            }
            Err(e) => return Err(unavailable("get_version", name, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn existing_versions(&self, name: &str) -> RegistryResult<Vec<u64>> {
        let dir = self.versions_dir(name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(unavailable("list_versions", name, e)),
        };

        let mut versions: Vec<u64> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().and_then(|s| s.parse().ok()))
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    fn attach_aliases(&self, name: &str, version: &mut ModelVersion) -> RegistryResult<()> {
        let aliases = self.read_aliases(name)?;
        version.aliases = aliases
            .iter()
            .filter(|(_, v)| **v == version.version)
            .map(|(alias, _)| alias.clone())
            .collect();
        Ok(())
    }
}

fn unavailable(operation: &str, model: &str, err: std::io::Error) -> RegistryError {
    RegistryError::unavailable_with_context(
        err.to_string(),
        ErrorContext::new(operation).with_model(model),
    )
}

#[async_trait]
impl ModelRegistry for FileRegistry {
    async fn create_version(
        &self,
        name: &str,
        artifact: &ModelArtifact,
        meta: VersionMeta,
    ) -> RegistryResult<ModelVersion> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(RegistryError::validation(format!(
                "invalid model name '{}'",
                name
            )));
        }

        let _guard = self.write_lock.lock();

        let version = self
            .existing_versions(name)?
            .last()
            .copied()
            .unwrap_or(0)
            + 1;
        let dir = self.version_dir(name, version);
        fs::create_dir_all(&dir).map_err(|e| unavailable("create_version", name, e))?;

        let artifact_bytes = artifact
            .to_bytes()
            .map_err(|e| RegistryError::storage(e.to_string()))?;
        let artifact_path = dir.join(ARTIFACT_FILE);
        fs::write(&artifact_path, &artifact_bytes)
            .map_err(|e| unavailable("create_version", name, e))?;

        let record = ModelVersion {
            name: name.to_string(),
            version,
            source: artifact_path.display().to_string(),
            run_id: meta.run_id,
            experiment: meta.experiment,
            created_at: Utc::now(),
            checksum: hex::encode(Sha256::digest(&artifact_bytes)),
            metrics: meta.metrics,
            aliases: vec![],
        };
        fs::write(dir.join(META_FILE), serde_json::to_vec_pretty(&record)?)
            .map_err(|e| unavailable("create_version", name, e))?;

        Ok(record)
    }

    async fn list_versions(&self, name: &str) -> RegistryResult<Vec<ModelVersion>> {
        let mut result = Vec::new();
        for v in self.existing_versions(name)? {
            let mut record = self.read_meta(name, v)?;
            self.attach_aliases(name, &mut record)?;
            result.push(record);
        }
        Ok(result)
    }

    async fn get_version(&self, name: &str, version: u64) -> RegistryResult<ModelVersion> {
        let mut record = self.read_meta(name, version)?;
        self.attach_aliases(name, &mut record)?;
        Ok(record)
    }

    async fn set_alias(&self, name: &str, alias: &str, version: u64) -> RegistryResult<()> {
        let _guard = self.write_lock.lock();

        // The target must exist before the pointer moves
        self.read_meta(name, version)?;

        let mut aliases = self.read_aliases(name)?;
        aliases.insert(alias.to_string(), version);
        self.write_aliases(name, &aliases)
    }

    async fn resolve_alias(&self, name: &str, alias: &str) -> RegistryResult<Option<u64>> {
        Ok(self.read_aliases(name)?.get(alias).copied())
    }

    async fn health_check(&self) -> RegistryResult<bool> {
        Ok(self.root.is_dir())
    }
}
