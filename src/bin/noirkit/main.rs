//! noirkit CLI - incremental Noir builds for host build tools

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use noirkit::util::diagnostic::emit;
use noirkit::{GlobalContext, NoirError};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<NoirError>() {
            Some(err) => emit(&err.to_diagnostic(), std::io::stderr().is_terminal()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("noirkit=debug")
    } else {
        EnvFilter::new("noirkit=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(&ctx, args),
        Commands::Clean(args) => commands::clean::execute(&ctx, args),
        Commands::New(args) => commands::new::execute(&ctx, args),
        Commands::Install(args) => commands::install::execute(&ctx, args),
        Commands::Artifact(args) => commands::artifact::execute(&ctx, args),
        Commands::Sources(args) => commands::sources::execute(&ctx, args),
        Commands::Check(args) => commands::check::execute(&ctx, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
