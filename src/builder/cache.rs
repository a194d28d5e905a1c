//! Persistent build cache for incremental compiles.
//!
//! The cache records a fingerprint of the whole Noir source tree and one
//! content hash per compiled artifact, keyed to the toolchain settings that
//! produced them. A cache written under different settings, or one that
//! cannot be read back, is treated as empty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::workspace::TARGET_DIR_NAME;
use crate::util::config::Config;
use crate::util::fs::write_string;
use crate::util::hash::{hash_dir, sha256_file};

/// File name of the cache inside the cache directory.
pub const CACHE_FILE: &str = "noir-files-cache.json";

/// On-disk cache layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CacheRecord {
    /// Fingerprint of the toolchain settings
    pub tooling_versions: String,

    /// Fingerprint of the Noir source tree
    pub source_files: String,

    /// Content hash per artifact path
    pub json_files: BTreeMap<String, String>,
}

/// In-memory build cache, persisted after every mutation.
#[derive(Debug)]
pub struct BuildCache {
    path: PathBuf,
    noir_dir: PathBuf,
    record: CacheRecord,
}

impl BuildCache {
    /// Load the cache for `config`.
    ///
    /// Never fails: a missing, unreadable or stale cache yields an empty one.
    pub fn load(config: &Config) -> Self {
        let path = config.cache_dir.join(CACHE_FILE);
        let tooling = config.tooling_fingerprint();

        let record = match read_record(&path) {
            Ok(Some(record)) if record.tooling_versions == tooling => record,
            Ok(Some(_)) => {
                tracing::debug!("toolchain settings changed, discarding {}", path.display());
                CacheRecord::empty(tooling)
            }
            Ok(None) => CacheRecord::empty(tooling),
            Err(e) => {
                tracing::debug!("ignoring unreadable cache {}: {:#}", path.display(), e);
                CacheRecord::empty(tooling)
            }
        };

        BuildCache {
            path,
            noir_dir: config.noir_dir.clone(),
            record,
        }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &CacheRecord {
        &self.record
    }

    /// Whether the Noir source tree differs from the last committed one.
    pub fn has_source_changed(&self) -> Result<bool> {
        Ok(self.source_hash()? != self.record.source_files)
    }

    /// Record the current source tree fingerprint.
    pub fn commit_source_hash(&mut self) -> Result<()> {
        self.record.source_files = self.source_hash()?;
        self.persist()
    }

    /// Whether `artifact` differs from its last committed content.
    pub fn has_artifact_changed(&self, artifact: &Path) -> Result<bool> {
        let current = sha256_file(artifact)?;
        Ok(self.record.json_files.get(&key(artifact)) != Some(&current))
    }

    /// Record the current content hash of `artifact`.
    pub fn commit_artifact_hash(&mut self, artifact: &Path) -> Result<()> {
        let current = sha256_file(artifact)?;
        self.record.json_files.insert(key(artifact), current);
        self.persist()
    }

    fn source_hash(&self) -> Result<String> {
        hash_dir(&self.noir_dir, &[TARGET_DIR_NAME])
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.record)
            .context("failed to serialize build cache")?;
        write_string(&self.path, &json)
    }
}

impl CacheRecord {
    fn empty(tooling_versions: String) -> Self {
        CacheRecord {
            tooling_versions,
            ..Default::default()
        }
    }
}

fn read_record(path: &Path) -> Result<Option<CacheRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
