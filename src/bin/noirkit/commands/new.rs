//! `noirkit new` command

use anyhow::Result;

use crate::cli::NewArgs;
use noirkit::ops::{new_package, NewOptions};
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: NewArgs) -> Result<()> {
    let config = ctx.load_config()?;

    let opts = NewOptions {
        name: args.name,
        lib: args.lib,
        no_add: args.no_add,
    };
    let path = new_package(&config.noir_dir, &opts)?;

    let kind = if opts.lib { "library" } else { "binary" };
    eprintln!("     Created {} `{}` package at {}", kind, opts.name, path.display());

    Ok(())
}
