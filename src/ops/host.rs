//! Hooks into the host build tool.
//!
//! noirkit runs inside a host project (Foundry, Hardhat, ...). The host's
//! own compile and clean commands run around noirkit's steps, and the
//! generated verifiers are handed to the host compiler as extra sources.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::artifact::verifier_paths;
use crate::util::config::Config;
use crate::util::errors::NoirError;
use crate::util::process::ProcessBuilder;

/// Configured host commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTool {
    root: PathBuf,
    compile: Option<Vec<String>>,
    clean: Option<Vec<String>>,
}

impl HostTool {
    /// Read the `[host]` table of the project config.
    pub fn from_config(config: &Config) -> Result<Self> {
        for (key, argv) in [("compile", &config.host.compile), ("clean", &config.host.clean)] {
            if matches!(argv, Some(argv) if argv.is_empty()) {
                let message = format!("`host.{}` must not be empty", key);
                return Err(NoirError::config(message).into());
            }
        }

        Ok(HostTool {
            root: config.root.clone(),
            compile: config.host.compile.clone(),
            clean: config.host.clean.clone(),
        })
    }

    pub fn has_compile(&self) -> bool {
        self.compile.is_some()
    }

    pub fn has_clean(&self) -> bool {
        self.clean.is_some()
    }

    /// Run the host compile command, if any.
    pub fn run_compile(&self) -> Result<bool> {
        self.run(self.compile.as_deref())
    }

    /// Run the host clean command, if any.
    pub fn run_clean(&self) -> Result<bool> {
        self.run(self.clean.as_deref())
    }

    fn run(&self, argv: Option<&[String]>) -> Result<bool> {
        let Some((program, args)) = argv.and_then(|a| a.split_first()) else {
            return Ok(false);
        };

        ProcessBuilder::new(program)
            .args(args)
            .cwd(&self.root)
            .status_and_check()?;
        Ok(true)
    }
}

/// Generated verifier sources for the host compiler.
pub fn source_paths(config: &Config) -> Result<Vec<PathBuf>> {
    verifier_paths(&config.target_dir())
}
