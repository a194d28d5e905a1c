//! Package - a compilable Noir package in the workspace.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::manifest::{NargoManifest, MANIFEST_NAME};

/// A workspace member with its declared name.
///
/// Recomputed on every invocation; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Name from the package's own Nargo.toml
    name: String,

    /// Root directory of the package
    root: PathBuf,
}

impl Package {
    /// Load a package from its directory.
    pub fn load(root: &Path) -> Result<Self> {
        let manifest = NargoManifest::load(&root.join(MANIFEST_NAME))?;
        let name = manifest.package_name()?.to_string();

        Ok(Package {
            name,
            root: root.to_path_buf(),
        })
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name of this package's compiled artifact.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}
