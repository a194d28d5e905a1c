//! `noirkit sources` command

use anyhow::Result;

use crate::cli::SourcesArgs;
use noirkit::ops::source_paths;
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, _args: SourcesArgs) -> Result<()> {
    let config = ctx.load_config()?;

    for path in source_paths(&config)? {
        println!("{}", path.display());
    }

    Ok(())
}
