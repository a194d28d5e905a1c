//! Test fixtures for common test scenarios.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::{generate_package_manifest, PackageType, MAIN_TEMPLATE, MANIFEST_NAME};
use crate::util::config::{Config, RawConfig, CONFIG_FILE};

/// A host project with a Noir workspace under `noir/`.
///
/// The directory is removed when the fixture is dropped.
#[derive(Debug)]
pub struct WorkspaceFixture {
    dir: TempDir,
    config_toml: String,
}

impl WorkspaceFixture {
    /// Create an empty project with the default configuration.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("noir")).unwrap();

        let fixture = WorkspaceFixture {
            dir,
            config_toml: "[noir]\nversion = \"1.0.0-beta.3\"\n".to_string(),
        };
        fixture.write_config();
        fixture
    }

    /// Append raw lines to the `[noir]` table of Noirkit.toml.
    pub fn with_noir_settings(mut self, settings: &str) -> Self {
        self.config_toml.push_str(settings);
        if !settings.ends_with('\n') {
            self.config_toml.push('\n');
        }
        self.write_config();
        self
    }

    /// Add a binary package in `noir/<name>` without declaring it.
    pub fn with_package(self, name: &str) -> Self {
        let pkg = self.noir_dir().join(name);
        std::fs::create_dir_all(pkg.join("src")).unwrap();
        std::fs::write(
            pkg.join(MANIFEST_NAME),
            generate_package_manifest(name, PackageType::Bin),
        )
        .unwrap();
        std::fs::write(pkg.join("src/main.nr"), MAIN_TEMPLATE).unwrap();
        self
    }

    /// Write the root workspace manifest declaring `members`.
    pub fn with_members(self, members: &[&str]) -> Self {
        let list = members
            .iter()
            .map(|m| format!("\"{}\"", m))
            .collect::<Vec<_>>()
            .join(", ");
        std::fs::write(
            self.noir_dir().join(MANIFEST_NAME),
            format!("[workspace]\nmembers = [{}]\n", list),
        )
        .unwrap();
        self
    }

    /// Overwrite a package's `src/main.nr`.
    pub fn edit_source(&self, package: &str, content: &str) {
        std::fs::write(self.noir_dir().join(package).join("src/main.nr"), content).unwrap();
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn noir_dir(&self) -> PathBuf {
        self.root().join("noir")
    }

    pub fn target_dir(&self) -> PathBuf {
        self.noir_dir().join("target")
    }

    /// Resolve the current Noirkit.toml.
    pub fn config(&self) -> Config {
        let raw: RawConfig = toml::from_str(&self.config_toml).unwrap();
        Config::resolve(self.root(), raw).unwrap()
    }

    fn write_config(&self) {
        std::fs::write(self.root().join(CONFIG_FILE), &self.config_toml).unwrap();
    }
}

impl Default for WorkspaceFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Workspace;

    #[test]
    fn test_workspace_fixture() {
        let ws = WorkspaceFixture::new()
            .with_package("a")
            .with_package("b")
            .with_members(&["a", "b"]);

        let loaded = Workspace::load(&ws.noir_dir()).unwrap();
        assert_eq!(loaded.packages().len(), 2);
        assert_eq!(ws.config().noir_dir, ws.noir_dir());
        assert!(ws.root().join(CONFIG_FILE).exists());
    }
}
