//! `noirkit install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, _args: InstallArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let env = ctx.env(&config)?;

    eprintln!("   Installed nargo@{} at {}", config.noir.version, env.nargo.display());
    eprintln!("   Installed bb@{} at {}", config.noir.bb_version, env.bb.display());

    Ok(())
}
