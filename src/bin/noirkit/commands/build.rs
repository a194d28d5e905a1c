//! `noirkit build` command

use std::time::Instant;

use anyhow::Result;

use crate::cli::BuildArgs;
use noirkit::core::workspace::check_workspace;
use noirkit::ops::{build, CompileOptions};
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: BuildArgs) -> Result<()> {
    let start = Instant::now();
    let config = ctx.load_config()?;

    // Workspace errors must surface before a toolchain install is attempted.
    check_workspace(&config.noir_dir, config.noir.skip_nargo_workspace_check)?;
    let toolchain = ctx.env(&config)?.toolchain();

    let opts = CompileOptions { force: args.force };
    let report = build(&config, &toolchain, &opts)?;

    for name in &report.compiled {
        eprintln!("   Compiling {}", name);
    }
    for path in &report.generated {
        eprintln!("  Generating {}", path.display());
    }
    if ctx.is_verbose() {
        for path in &report.skipped {
            eprintln!("       Fresh {}", path.display());
        }
    }

    eprintln!(
        "    Finished {} circuit(s), {} verifier(s) in {:.2}s",
        report.compiled.len(),
        report.generated.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
