//! `noirkit clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use noirkit::ops::clean;
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, _args: CleanArgs) -> Result<()> {
    let config = ctx.load_config()?;

    if clean(&config)? {
        eprintln!("     Removed {}", config.target_dir().display());
    }

    Ok(())
}
