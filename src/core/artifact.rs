//! Compiled circuit artifacts and generated verifiers in the target directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::errors::NoirError;
use crate::util::fs::{glob_files, write_string};

/// A compiled Noir program as written by `nargo compile`.
///
/// Only the fields noirkit reads are typed; everything else is kept in
/// `extra` so writing the program back out does not drop metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noir_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Value>,

    #[serde(default)]
    pub abi: Value,

    /// Base64-encoded ACIR bytecode
    pub bytecode: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CompiledProgram {
    /// Parse a program from JSON text.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Write the program as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .with_context(|| format!("failed to serialize {}", path.display()))?;
        write_string(path, &json)
    }
}

/// Path of the compiled artifact for circuit `name`.
pub fn artifact_path(target_dir: &Path, name: &str) -> PathBuf {
    target_dir.join(format!("{}.json", name))
}

/// Load the compiled artifact for circuit `name`.
pub fn load_artifact(target_dir: &Path, name: &str) -> Result<CompiledProgram> {
    read_program(&artifact_path(target_dir, name), name)
}

/// Read a program from an artifact file, naming it `name` in errors.
pub fn read_program(path: &Path, name: &str) -> Result<CompiledProgram> {
    if !path.exists() {
        return Err(NoirError::ArtifactNotFound {
            name: name.to_string(),
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact: {}", path.display()))?;

    CompiledProgram::from_json(&content).map_err(|e| {
        NoirError::ArtifactParse {
            name: name.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Circuit name of an artifact path (`<target>/foo.json` -> `foo`).
pub fn artifact_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every compiled artifact in the target directory, sorted.
pub fn artifact_paths(target_dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(target_dir, "*.json")
}

/// Every generated verifier in the target directory, sorted.
pub fn verifier_paths(target_dir: &Path) -> Result<Vec<PathBuf>> {
    glob_files(target_dir, "*.sol")
}
