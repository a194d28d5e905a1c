//! `noirkit artifact` command
//!
//! Loads a compiled circuit from the target directory and prints a summary.

use anyhow::Result;

use crate::cli::ArtifactArgs;
use noirkit::core::artifact::{artifact_path, load_artifact};
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ArtifactArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let target_dir = config.target_dir();
    let program = load_artifact(&target_dir, &args.name)?;

    println!("name:         {}", args.name);
    println!("path:         {}", artifact_path(&target_dir, &args.name).display());
    println!(
        "noir version: {}",
        program.noir_version.as_deref().unwrap_or("unknown")
    );
    println!("bytecode:     {} bytes", program.bytecode.len());

    Ok(())
}
