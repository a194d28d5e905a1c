//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// noirkit - Noir circuits and Solidity verifiers for your host build tool
#[derive(Parser)]
#[command(name = "noirkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile Noir circuits and generate verifiers, then run the host compile
    Build(BuildArgs),

    /// Run the host clean and remove the Noir target directory
    Clean(CleanArgs),

    /// Create a new Noir package in the workspace
    New(NewArgs),

    /// Install nargo and bb for the configured versions
    Install(InstallArgs),

    /// Show a compiled circuit
    Artifact(ArtifactArgs),

    /// Print generated verifier paths for the host compiler
    Sources(SourcesArgs),

    /// Validate the Noir workspace members
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Ignore the build cache and rebuild everything
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CleanArgs {}

#[derive(Args)]
pub struct NewArgs {
    /// Package name
    pub name: String,

    /// Create a library instead of a binary
    #[arg(long)]
    pub lib: bool,

    /// Do not add the package to the workspace Nargo.toml
    #[arg(long)]
    pub no_add: bool,
}

#[derive(Args)]
pub struct InstallArgs {}

#[derive(Args)]
pub struct ArtifactArgs {
    /// Circuit name
    pub name: String,
}

#[derive(Args)]
pub struct SourcesArgs {}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
