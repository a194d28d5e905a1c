//! On-demand installation of `nargo` and `bb`.
//!
//! Binaries are installed per version under the user's `.nargo` and `.bb`
//! directories, in a `noirkit` subtree so they never clash with a
//! user-managed toolchain. Every step is skipped when its binary exists.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::util::errors::NoirError;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_executable, ProcessBuilder};

const NOIRUP_URL: &str = "https://raw.githubusercontent.com/noir-lang/noirup/main/install";
const BBUP_URL: &str = "https://raw.githubusercontent.com/AztecProtocol/aztec-packages/master/barretenberg/cpp/installation/install";

/// Subdirectory separating noirkit-managed installs.
const INSTALL_DIR: &str = "noirkit";

/// Installs versioned toolchain binaries under a home directory.
#[derive(Debug, Clone)]
pub struct ToolchainInstaller {
    home: PathBuf,
}

impl ToolchainInstaller {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        ToolchainInstaller { home: home.into() }
    }

    pub fn nargo_home(&self) -> PathBuf {
        self.home.join(".nargo")
    }

    pub fn bb_home(&self) -> PathBuf {
        self.home.join(".bb")
    }

    pub fn noirup_path(&self) -> PathBuf {
        self.nargo_home().join("bin").join("noirup")
    }

    pub fn bbup_path(&self) -> PathBuf {
        self.bb_home().join("bbup")
    }

    /// Where `nargo` of `version` is installed.
    pub fn nargo_path(&self, version: &str) -> PathBuf {
        self.nargo_version_dir(version).join("bin").join("nargo")
    }

    /// Where `bb` of `version` is installed.
    pub fn bb_path(&self, version: &str) -> PathBuf {
        self.bb_version_dir(version).join("bb")
    }

    fn nargo_version_dir(&self, version: &str) -> PathBuf {
        self.nargo_home()
            .join(INSTALL_DIR)
            .join(format!("v{}", version))
    }

    fn bb_version_dir(&self, version: &str) -> PathBuf {
        self.bb_home().join(INSTALL_DIR).join(format!("v{}", version))
    }

    /// Install the `noirup` installer if missing.
    pub fn install_noirup(&self) -> Result<PathBuf> {
        let noirup = self.noirup_path();
        if !noirup.exists() {
            let _spinner = Spinner::start("Installing noirup");
            run_script(NOIRUP_URL, "NARGO_HOME", &self.nargo_home())?;
        }
        Ok(noirup)
    }

    /// Install `nargo` of `version` if missing.
    pub fn install_nargo(&self, version: &str) -> Result<PathBuf> {
        let nargo = self.nargo_path(version);
        if nargo.exists() {
            return Ok(nargo);
        }

        let noirup = self.install_noirup()?;
        let dir = self.nargo_version_dir(version);
        ensure_dir(&dir.join("bin"))?;

        let message = format!("Installing nargo@{} in {}", version, dir.display());
        let _spinner = Spinner::start(message);
        ProcessBuilder::new(&noirup)
            .args(["-v", version])
            .env("NARGO_HOME", dir.to_string_lossy())
            .exec_and_check()?;

        Ok(nargo)
    }

    /// Install the `bbup` installer if missing.
    pub fn install_bbup(&self) -> Result<PathBuf> {
        let bbup = self.bbup_path();
        if !bbup.exists() {
            let _spinner = Spinner::start("Installing bbup");
            run_script(BBUP_URL, "BB_HOME", &self.bb_home())?;
        }
        Ok(bbup)
    }

    /// Install `bb` of `version` if missing.
    pub fn install_bb(&self, version: &str) -> Result<PathBuf> {
        let bb = self.bb_path(version);
        if bb.exists() {
            return Ok(bb);
        }

        let bbup = self.install_bbup()?;
        let dir = self.bb_version_dir(version);
        ensure_dir(&dir)?;

        let message = format!("Installing bb@{} in {}", version, dir.display());
        let _spinner = Spinner::start(message);
        ProcessBuilder::new(&bbup)
            .args(["-v", version])
            .env("BB_HOME", dir.to_string_lossy())
            .exec_and_check()?;

        Ok(bb)
    }
}

/// Download an installer script and run it with bash.
fn run_script(url: &str, home_var: &str, home: &Path) -> Result<()> {
    let bash = find_executable("bash").ok_or_else(|| NoirError::Toolchain {
        command: "bash".to_string(),
        status: None,
        stderr: "bash is required to run the toolchain installer".to_string(),
    })?;
    let script = download_script(url)?;
    ProcessBuilder::new(bash)
        .arg("-c")
        .arg(script)
        .env(home_var, home.to_string_lossy())
        .exec_and_check()?;
    Ok(())
}

fn download_script(url: &str) -> Result<String> {
    tracing::debug!("downloading {}", url);

    let response =
        reqwest::blocking::get(url).with_context(|| format!("failed to download {}", url))?;

    if !response.status().is_success() {
        return Err(NoirError::Toolchain {
            command: format!("GET {}", url),
            status: Some(i32::from(response.status().as_u16())),
            stderr: format!("Failed to download {}", url),
        }
        .into());
    }

    response
        .text()
        .with_context(|| format!("failed to read response body from {}", url))
}

/// Spinner shown while an install step runs; cleared on drop.
struct Spinner(ProgressBar);

impl Spinner {
    fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::info!("{}", message);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Spinner(pb)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
