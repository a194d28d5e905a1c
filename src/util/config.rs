//! Project configuration (`Noirkit.toml`).
//!
//! The raw file is parsed with serde, then resolved once into a [`Config`]
//! that is read-only for the rest of the invocation:
//!
//! ```toml
//! [paths]
//! noir = "noir"
//! cache = "cache"
//!
//! [noir]
//! version = "1.0.0-beta.3"
//! flavor = ["ultra_keccak_honk", "ultra_plonk"]
//!
//! [host]
//! compile = ["forge", "build"]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::flavor::ProofFlavor;
use crate::core::workspace;
use crate::util::diagnostic::suggestions;
use crate::util::errors::NoirError;
use crate::util::fs::resolve_against;
use crate::util::hash::sha256_str;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "Noirkit.toml";

/// Known `bb` releases paired with the Noir release they were built for.
const BB_VERSIONS: &[(&str, &str)] = &[("1.0.0-beta.3", "0.82.0")];

/// `Noirkit.toml` as written by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Path settings
    pub paths: RawPaths,

    /// Toolchain settings
    pub noir: RawNoirConfig,

    /// Downstream build tool commands
    pub host: HostConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPaths {
    /// Noir workspace root, absolute or relative to the project root
    pub noir: Option<PathBuf>,

    /// Build cache directory, absolute or relative to the project root
    pub cache: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNoirConfig {
    /// Noir (nargo) version
    pub version: Option<String>,

    /// Barretenberg (bb) version; inferred from `version` when omitted
    pub bb_version: Option<String>,

    /// One flavor or a list of flavors
    pub flavor: Option<FlavorSetting>,

    /// Skip validating the root Nargo.toml members
    pub skip_nargo_workspace_check: bool,
}

/// `flavor = "x"` or `flavor = ["x", "y"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlavorSetting {
    One(String),
    Many(Vec<String>),
}

/// Commands of the host build tool that noirkit hooks into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Run after Noir artifacts and verifiers are up to date
    pub compile: Option<Vec<String>>,

    /// Run before the Noir target directory is removed
    pub clean: Option<Vec<String>>,
}

/// Resolved toolchain settings.
///
/// Its serialized form is the tooling fingerprint of the build cache, so any
/// field added here invalidates existing caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoirConfig {
    pub version: Version,
    pub bb_version: String,
    pub flavor: BTreeSet<ProofFlavor>,
    pub skip_nargo_workspace_check: bool,
}

/// Resolved project configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root (directory containing Noirkit.toml)
    pub root: PathBuf,

    /// Noir workspace root
    pub noir_dir: PathBuf,

    /// Build cache directory
    pub cache_dir: PathBuf,

    pub noir: NoirConfig,

    pub host: HostConfig,
}

impl RawConfig {
    /// Load raw configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

impl Config {
    /// Load and resolve `<root>/Noirkit.toml`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Err(NoirError::Config {
                message: format!("could not find `{}` in `{}`", CONFIG_FILE, root.display()),
                items: Vec::new(),
                help: Some(suggestions::NO_CONFIG.to_string()),
            }
            .into());
        }
        let raw = RawConfig::load(&path)?;
        Self::resolve(root, raw)
    }

    /// Apply defaults and validate a raw configuration.
    pub fn resolve(root: &Path, raw: RawConfig) -> Result<Self> {
        let noir_dir =
            resolve_against(root, raw.paths.noir.as_deref().unwrap_or(Path::new("noir")));
        let cache_dir =
            resolve_against(root, raw.paths.cache.as_deref().unwrap_or(Path::new("cache")));

        let noir = resolve_noir_config(raw.noir)?;

        Ok(Config {
            root: root.to_path_buf(),
            noir_dir,
            cache_dir,
            noir,
            host: raw.host,
        })
    }

    /// Output directory for compiled artifacts and verifiers.
    pub fn target_dir(&self) -> PathBuf {
        workspace::target_dir(&self.noir_dir)
    }

    /// Fingerprint of the toolchain settings.
    pub fn tooling_fingerprint(&self) -> String {
        // Serializing plain strings, sets and bools cannot fail.
        let json = serde_json::to_string(&self.noir).unwrap_or_default();
        sha256_str(&json)
    }
}

fn resolve_noir_config(raw: RawNoirConfig) -> Result<NoirConfig> {
    let version_str = raw.version.ok_or_else(|| NoirError::Config {
        message: "`noir.version` is not set".to_string(),
        items: Vec::new(),
        help: Some(suggestions::NO_CONFIG.to_string()),
    })?;
    let version = Version::parse(version_str.trim_start_matches('v')).map_err(|e| {
        NoirError::config(format!("invalid noir version `{}`: {}", version_str, e))
    })?;

    let bb_version = match raw.bb_version {
        Some(v) => v,
        None => infer_bb_version(&version).ok_or_else(|| NoirError::Config {
            message: format!("cannot infer bb version for noir@{}", version),
            items: Vec::new(),
            help: Some("Please specify `noir.bb_version` in Noirkit.toml".to_string()),
        })?,
    };

    let names = match raw.flavor {
        None => vec![ProofFlavor::PRIMARY.as_str().to_string()],
        Some(FlavorSetting::One(name)) => vec![name],
        Some(FlavorSetting::Many(names)) => names,
    };

    let mut flavor = BTreeSet::new();
    let mut unknown = Vec::new();
    for name in names {
        match name.parse::<ProofFlavor>() {
            Ok(f) => {
                flavor.insert(f);
            }
            Err(_) => unknown.push(name),
        }
    }
    if !unknown.is_empty() {
        return Err(NoirError::Config {
            message: "unsupported Noir proof flavors in `noir.flavor`:".to_string(),
            items: unknown,
            help: Some(format!(
                "Supported flavors: {}",
                ProofFlavor::ALL.map(|f| f.as_str()).join(", ")
            )),
        }
        .into());
    }

    Ok(NoirConfig {
        version,
        bb_version,
        flavor,
        skip_nargo_workspace_check: raw.skip_nargo_workspace_check,
    })
}

fn infer_bb_version(version: &Version) -> Option<String> {
    let key = version.to_string();
    BB_VERSIONS
        .iter()
        .find(|(noir, _)| *noir == key)
        .map(|(_, bb)| bb.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(toml_src: &str) -> RawConfig {
        toml::from_str(toml_src).unwrap()
    }

    fn config_error(err: anyhow::Error) -> String {
        match err.downcast_ref::<NoirError>() {
            Some(e @ NoirError::Config { .. }) => e.to_string(),
            _ => panic!("expected config error, got {:#}", err),
        }
    }

    #[test]
    fn test_defaults() {
        let raw = parse("[noir]\nversion = \"1.0.0-beta.3\"\n");
        let config = Config::resolve(Path::new("/project"), raw).unwrap();

        assert_eq!(config.noir_dir, PathBuf::from("/project/noir"));
        assert_eq!(config.cache_dir, PathBuf::from("/project/cache"));
        assert_eq!(config.target_dir(), PathBuf::from("/project/noir/target"));
        assert_eq!(config.noir.bb_version, "0.82.0");
        assert_eq!(
            config.noir.flavor.iter().copied().collect::<Vec<_>>(),
            vec![ProofFlavor::UltraKeccakHonk]
        );
        assert!(!config.noir.skip_nargo_workspace_check);
        assert_eq!(config.host, HostConfig::default());
    }

    #[test]
    fn test_relative_and_absolute_paths() {
        let raw = parse(
            r#"
[paths]
noir = "noir2"
cache = "/tmp/noir-cache"

[noir]
version = "1.0.0-beta.3"
"#,
        );
        let config = Config::resolve(Path::new("/project"), raw).unwrap();
        assert_eq!(config.noir_dir, PathBuf::from("/project/noir2"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/noir-cache"));
    }

    #[test]
    fn test_flavor_single_string_and_list() {
        let single = parse("[noir]\nversion = \"1.0.0-beta.3\"\nflavor = \"ultra_plonk\"\n");
        let config = Config::resolve(Path::new("/p"), single).unwrap();
        assert!(config.noir.flavor.contains(&ProofFlavor::UltraPlonk));
        assert_eq!(config.noir.flavor.len(), 1);

        let many = parse(
            "[noir]\nversion = \"1.0.0-beta.3\"\nflavor = [\"ultra_plonk\", \"ultra_keccak_honk\", \"ultra_plonk\"]\n",
        );
        let config = Config::resolve(Path::new("/p"), many).unwrap();
        assert_eq!(config.noir.flavor.len(), 2);
    }

    #[test]
    fn test_unknown_flavors_are_listed() {
        let raw = parse("[noir]\nversion = \"1.0.0-beta.3\"\nflavor = [\"groth16\", \"stark\"]\n");
        let msg = config_error(Config::resolve(Path::new("/p"), raw).unwrap_err());
        assert!(msg.contains("- groth16"));
        assert!(msg.contains("- stark"));
    }

    #[test]
    fn test_missing_version() {
        let raw = parse("[noir]\nbb_version = \"0.82.0\"\n");
        let msg = config_error(Config::resolve(Path::new("/p"), raw).unwrap_err());
        assert!(msg.contains("noir.version"));
    }

    #[test]
    fn test_invalid_version() {
        let raw = parse("[noir]\nversion = \"latest\"\nbb_version = \"0.82.0\"\n");
        let msg = config_error(Config::resolve(Path::new("/p"), raw).unwrap_err());
        assert!(msg.contains("invalid noir version `latest`"));
    }

    #[test]
    fn test_uninferable_bb_version() {
        let raw = parse("[noir]\nversion = \"0.36.0\"\n");
        let msg = config_error(Config::resolve(Path::new("/p"), raw).unwrap_err());
        assert!(msg.contains("cannot infer bb version for noir@0.36.0"));

        let raw = parse("[noir]\nversion = \"0.36.0\"\nbb_version = \"0.58.0\"\n");
        let config = Config::resolve(Path::new("/p"), raw).unwrap();
        assert_eq!(config.noir.bb_version, "0.58.0");
    }

    #[test]
    fn test_tooling_fingerprint_tracks_noir_settings() {
        let a = Config::resolve(
            Path::new("/p"),
            parse("[noir]\nversion = \"1.0.0-beta.3\"\n"),
        )
        .unwrap();
        let b = Config::resolve(
            Path::new("/other"),
            parse("[noir]\nversion = \"1.0.0-beta.3\"\n[host]\ncompile = [\"forge\", \"build\"]\n"),
        )
        .unwrap();
        let c = Config::resolve(
            Path::new("/p"),
            parse("[noir]\nversion = \"1.0.0-beta.3\"\nflavor = \"ultra_plonk\"\n"),
        )
        .unwrap();

        assert_eq!(a.tooling_fingerprint(), b.tooling_fingerprint());
        assert_ne!(a.tooling_fingerprint(), c.tooling_fingerprint());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let msg = config_error(Config::load(tmp.path()).unwrap_err());
        assert!(msg.contains("could not find `Noirkit.toml`"));
    }

    #[test]
    fn test_load_from_disk() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[noir]\nversion = \"1.0.0-beta.3\"\n[host]\ncompile = [\"forge\", \"build\"]\n",
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.root, tmp.path());
        assert_eq!(
            config.host.compile,
            Some(vec!["forge".to_string(), "build".to_string()])
        );
    }
}
