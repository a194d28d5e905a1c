//! Global context for noirkit operations.
//!
//! Provides centralized access to the working directory, the project root
//! and the lazily-installed toolchain.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::builder::install::ToolchainInstaller;
use crate::builder::NargoToolchain;
use crate::util::config::{Config, CONFIG_FILE};
use crate::util::diagnostic::suggestions;
use crate::util::errors::NoirError;

/// Environment variable overriding the toolchain home directory.
pub const HOME_ENV: &str = "NOIRKIT_HOME";

/// Resolved toolchain binaries.
#[derive(Debug, Clone)]
pub struct NoirEnv {
    pub nargo: PathBuf,
    pub bb: PathBuf,
}

impl NoirEnv {
    pub fn toolchain(&self) -> NargoToolchain {
        NargoToolchain::new(&self.nargo, &self.bb)
    }
}

/// Global context containing paths and the toolchain environment.
#[derive(Debug)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Base directory for `.nargo` and `.bb`
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Installed on first use
    env: OnceLock<NoirEnv>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = match std::env::var_os(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        GlobalContext {
            cwd,
            home,
            verbose: false,
            env: OnceLock::new(),
        }
    }

    /// Override the toolchain home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the toolchain home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn installer(&self) -> ToolchainInstaller {
        ToolchainInstaller::new(&self.home)
    }

    /// Find the project root (directory containing Noirkit.toml), searching
    /// upward from cwd.
    pub fn find_project_root(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            if current.join(CONFIG_FILE).is_file() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(NoirError::Config {
                    message: format!(
                        "could not find `{}` in `{}` or any parent directory",
                        CONFIG_FILE,
                        self.cwd.display()
                    ),
                    items: Vec::new(),
                    help: Some(suggestions::NO_CONFIG.to_string()),
                }
                .into());
            }
        }
    }

    /// Load the project configuration.
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.find_project_root()?)
    }

    /// The toolchain for `config`, installed on first call.
    ///
    /// Later calls return the same environment without touching the disk.
    pub fn env(&self, config: &Config) -> Result<&NoirEnv> {
        if let Some(env) = self.env.get() {
            return Ok(env);
        }

        let installer = self.installer();
        let nargo = installer.install_nargo(&config.noir.version.to_string())?;
        let bb = installer.install_bb(&config.noir.bb_version)?;

        Ok(self.env.get_or_init(|| NoirEnv { nargo, bb }))
    }
}
