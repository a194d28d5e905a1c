//! Implementation of `noirkit clean`.

use anyhow::Result;

use crate::ops::host::HostTool;
use crate::util::config::Config;
use crate::util::fs::remove_dir_all_if_exists;

/// Run the host clean command, then remove the Noir target directory.
///
/// Returns whether a target directory was removed.
pub fn clean(config: &Config) -> Result<bool> {
    HostTool::from_config(config)?.run_clean()?;

    let target_dir = config.target_dir();
    if !target_dir.exists() {
        return Ok(false);
    }

    remove_dir_all_if_exists(&target_dir)?;
    tracing::debug!("removed {}", target_dir.display());
    Ok(true)
}
