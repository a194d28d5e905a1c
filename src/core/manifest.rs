//! Nargo.toml manifest parsing and templates.
//!
//! Only the fields noirkit needs are modelled: the package name and type, and
//! the workspace member list. Everything else in the file is ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::util::errors::NoirError;

/// File name of a Noir package or workspace manifest.
pub const MANIFEST_NAME: &str = "Nargo.toml";

/// Kind of a Noir package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Bin,
    Lib,
    Contract,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Bin => "bin",
            PackageType::Lib => "lib",
            PackageType::Contract => "contract",
        }
    }
}

/// `[package]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSection {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<PackageType>,
}

/// `[workspace]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceSection {
    #[serde(default)]
    pub members: Vec<String>,
}

/// A parsed Nargo.toml.
#[derive(Debug, Clone, Default)]
pub struct NargoManifest {
    /// Path the manifest was read from
    pub path: PathBuf,

    pub package: Option<PackageSection>,

    pub workspace: Option<WorkspaceSection>,
}

#[derive(Deserialize)]
struct RawManifest {
    package: Option<PackageSection>,
    workspace: Option<WorkspaceSection>,
}

impl NargoManifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        Ok(NargoManifest {
            path: path.to_path_buf(),
            package: raw.package,
            workspace: raw.workspace,
        })
    }

    /// The declared package name.
    ///
    /// Artifacts are named after it, so a manifest without one is an error
    /// rather than falling back to the directory name.
    pub fn package_name(&self) -> Result<&str> {
        self.package
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .ok_or_else(|| {
                NoirError::config(format!(
                    "Nargo.toml must contain a name, but {} does not",
                    self.path.display()
                ))
                .into()
            })
    }

    /// Declared workspace members, or an empty list without a `[workspace]`.
    pub fn members(&self) -> &[String] {
        self.workspace
            .as_ref()
            .map(|w| w.members.as_slice())
            .unwrap_or(&[])
    }
}

/// Generate the manifest for a new package.
pub fn generate_package_manifest(name: &str, kind: PackageType) -> String {
    let kind = kind.as_str();
    format!(
        r#"[package]
name = "{name}"
type = "{kind}"
authors = [""]

[dependencies]
"#
    )
}

/// Generate a root workspace manifest listing `members`.
pub fn generate_workspace_manifest(members: &[String]) -> String {
    let entries = members
        .iter()
        .map(|m| format!("  \"{}\"", m))
        .collect::<Vec<_>>()
        .join(",\n");

    if entries.is_empty() {
        "[workspace]\nmembers = []\n".to_string()
    } else {
        format!("[workspace]\nmembers = [\n{}\n]\n", entries)
    }
}

/// Starter `src/main.nr` for binary packages.
pub const MAIN_TEMPLATE: &str = r#"fn main(x: Field, y: pub Field) {
    assert(x != y);
}

#[test]
fn test_main() {
    main(1, 2);

    // Uncomment to make test fail
    // main(1, 1);
}
"#;

/// Starter `src/lib.nr` for library packages.
pub const LIB_TEMPLATE: &str = r#"fn not_equal(x: Field, y: Field) -> bool {
    x != y
}

#[test]
fn test_not_equal() {
    assert(not_equal(1, 2));

    // Uncomment to make test fail
    // assert(not_equal(1, 1));
}
"#;
