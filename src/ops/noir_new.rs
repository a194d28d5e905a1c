//! Implementation of `noirkit new`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use toml_edit::{Array, DocumentMut, Item, Table, Value};

use crate::core::manifest::{
    generate_package_manifest, PackageType, LIB_TEMPLATE, MAIN_TEMPLATE, MANIFEST_NAME,
};
use crate::util::errors::NoirError;
use crate::util::fs::{ensure_dir, read_to_string, write_string};

/// Options for creating a new Noir package.
#[derive(Debug, Clone)]
pub struct NewOptions {
    /// Package name
    pub name: String,

    /// Create a library package
    pub lib: bool,

    /// Do not add the package to the workspace members
    pub no_add: bool,
}

/// Create a package under the Noir workspace root.
///
/// Returns the new package directory.
pub fn new_package(noir_root: &Path, opts: &NewOptions) -> Result<PathBuf> {
    if opts.name.contains('-') {
        return Err(NoirError::config("Package name cannot contain '-'").into());
    }

    let path = noir_root.join(&opts.name);
    if path.exists() {
        bail!("destination `{}` already exists", path.display());
    }

    let (kind, source, template) = if opts.lib {
        (PackageType::Lib, "lib.nr", LIB_TEMPLATE)
    } else {
        (PackageType::Bin, "main.nr", MAIN_TEMPLATE)
    };

    let src_dir = path.join("src");
    ensure_dir(&src_dir)?;
    write_string(
        &path.join(MANIFEST_NAME),
        &generate_package_manifest(&opts.name, kind),
    )?;
    write_string(&src_dir.join(source), template)?;

    if !opts.no_add {
        add_workspace_member(&noir_root.join(MANIFEST_NAME), &opts.name)?;
    }

    Ok(path)
}

/// Append `member` to `[workspace] members`, keeping existing formatting.
///
/// The manifest and its tables are created when missing. Returns whether
/// the member was added.
pub fn add_workspace_member(manifest_path: &Path, member: &str) -> Result<bool> {
    let content = if manifest_path.exists() {
        read_to_string(manifest_path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    if !doc.contains_key("workspace") {
        doc["workspace"] = Item::Table(Table::new());
    }
    let Some(workspace) = doc["workspace"].as_table_like_mut() else {
        bail!("`workspace` in {} is not a table", manifest_path.display());
    };

    if !workspace.contains_key("members") {
        workspace.insert("members", Item::Value(Value::Array(Array::new())));
    }
    let Some(members) = workspace.get_mut("members").and_then(|m| m.as_array_mut()) else {
        bail!(
            "`workspace.members` in {} is not an array",
            manifest_path.display()
        );
    };

    if members.iter().any(|m| m.as_str() == Some(member)) {
        return Ok(false);
    }
    members.push(member);

    write_string(manifest_path, &doc.to_string())?;
    Ok(true)
}
