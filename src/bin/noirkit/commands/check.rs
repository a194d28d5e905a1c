//! `noirkit check` command

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::CheckArgs;
use noirkit::core::workspace::check_workspace;
use noirkit::core::WorkspaceCheck;
use noirkit::util::diagnostic::{emit, Diagnostic};
use noirkit::GlobalContext;

pub fn execute(ctx: &GlobalContext, _args: CheckArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let root = &config.noir_dir;

    match check_workspace(root, config.noir.skip_nargo_workspace_check)? {
        WorkspaceCheck::Skipped => emit(
            &Diagnostic::warning("Nargo workspace check is disabled")
                .with_context("`noir.skip_nargo_workspace_check` is set in Noirkit.toml"),
            std::io::stderr().is_terminal(),
        ),
        WorkspaceCheck::SinglePackage => {
            eprintln!("     Checked single package at {}", root.display())
        }
        WorkspaceCheck::Created(members) => eprintln!(
            "     Created {} with {} member(s)",
            root.join("Nargo.toml").display(),
            members.len()
        ),
        WorkspaceCheck::Valid => eprintln!("     Checked workspace at {}", root.display()),
    }

    Ok(())
}
