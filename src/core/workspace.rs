//! Workspace discovery and validation.
//!
//! A Noir workspace is a root directory with a `Nargo.toml` whose
//! `[workspace] members` lists package directories. A root that has its own
//! `src/` next to its `Nargo.toml` is a single package and skips all
//! member validation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{generate_workspace_manifest, NargoManifest, MANIFEST_NAME};
use crate::core::Package;
use crate::util::diagnostic::suggestions;
use crate::util::errors::NoirError;
use crate::util::fs::{ensure_dir, write_string};

/// Name of the output directory inside the workspace root.
pub const TARGET_DIR_NAME: &str = "target";

/// Output directory for a workspace root.
pub fn target_dir(root: &Path) -> PathBuf {
    root.join(TARGET_DIR_NAME)
}

/// Whether `root` is itself a package rather than a multi-package workspace.
pub fn is_single_package(root: &Path) -> bool {
    root.join(MANIFEST_NAME).exists() && root.join("src").exists()
}

/// Immediate subdirectories of `root` that contain a `Nargo.toml`, sorted.
pub fn discover_members(root: &Path) -> Result<Vec<String>> {
    let mut members = Vec::new();
    if !root.exists() {
        return Ok(members);
    }

    for entry in std::fs::read_dir(root)
        .with_context(|| format!("failed to read directory: {}", root.display()))?
    {
        let entry = entry?;
        // `Path::is_dir` follows symlinks, so linked member directories count.
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.join(MANIFEST_NAME).exists() {
            members.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    members.sort();
    Ok(members)
}

/// Discovered member directories that are not in `declared`.
pub fn validate_workspace(root: &Path, declared: &[String]) -> Result<BTreeSet<String>> {
    let declared: BTreeSet<&str> = declared
        .iter()
        .map(|m| m.trim_start_matches("./").trim_end_matches('/'))
        .collect();

    Ok(discover_members(root)?
        .into_iter()
        .filter(|m| !declared.contains(m.as_str()))
        .collect())
}

/// Outcome of [`check_workspace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCheck {
    /// Validation disabled by configuration
    Skipped,
    /// The root is a single package
    SinglePackage,
    /// No root manifest existed; one was written with these members
    Created(Vec<String>),
    /// Every discovered member is declared
    Valid,
}

/// Ensure the root manifest declares every member directory.
///
/// A missing root manifest is synthesized from the discovered directories.
/// An existing manifest that lacks entries is a config error naming all of
/// them at once.
pub fn check_workspace(root: &Path, skip_check: bool) -> Result<WorkspaceCheck> {
    if skip_check {
        return Ok(WorkspaceCheck::Skipped);
    }
    if is_single_package(root) {
        return Ok(WorkspaceCheck::SinglePackage);
    }

    let manifest_path = root.join(MANIFEST_NAME);
    if !manifest_path.exists() {
        let members = discover_members(root)?;
        write_string(&manifest_path, &generate_workspace_manifest(&members))?;
        tracing::info!(
            "Created {} in the Noir workspace folder. {}",
            MANIFEST_NAME,
            suggestions::SKIP_WORKSPACE_CHECK
        );
        return Ok(WorkspaceCheck::Created(members));
    }

    let manifest = NargoManifest::load(&manifest_path)?;
    let missing = validate_workspace(root, manifest.members())?;
    if missing.is_empty() {
        return Ok(WorkspaceCheck::Valid);
    }

    Err(NoirError::Config {
        message: format!(
            "You are missing these Noir folders in the root {}:",
            MANIFEST_NAME
        ),
        items: missing.into_iter().collect(),
        help: Some(suggestions::SKIP_WORKSPACE_CHECK.to_string()),
    }
    .into())
}

/// Write `<root>/.gitignore` ignoring the target directory, unless one exists.
///
/// Returns whether a file was created.
pub fn ensure_gitignore(root: &Path) -> Result<bool> {
    let path = root.join(".gitignore");
    if path.exists() {
        return Ok(false);
    }
    ensure_dir(root)?;
    write_string(&path, &format!("{}\n", TARGET_DIR_NAME))?;
    tracing::info!(
        "Added .gitignore to {}. To disable this behavior, create an empty .gitignore file there",
        root.display()
    );
    Ok(true)
}

/// The packages of a Noir workspace.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    packages: Vec<Package>,
}

impl Workspace {
    /// Load every package declared by the workspace at `root`.
    ///
    /// Members come from the root manifest in declaration order. A root
    /// without a manifest has no packages.
    pub fn load(root: &Path) -> Result<Self> {
        let packages = if is_single_package(root) {
            vec![Package::load(root)?]
        } else {
            let manifest_path = root.join(MANIFEST_NAME);
            if manifest_path.exists() {
                let manifest = NargoManifest::load(&manifest_path)?;
                manifest
                    .members()
                    .iter()
                    .map(|member| Package::load(&root.join(member)))
                    .collect::<Result<Vec<_>>>()?
            } else {
                tracing::debug!("no {} in {}", MANIFEST_NAME, root.display());
                Vec::new()
            }
        };

        Ok(Workspace {
            root: root.to_path_buf(),
            packages,
        })
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the output directory.
    pub fn target_dir(&self) -> PathBuf {
        target_dir(&self.root)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
