//! Toolchain abstraction for the Noir compiler and the `bb` backend.
//!
//! The orchestrator only talks to [`Toolchain`]; [`NargoToolchain`] drives
//! installed `nargo` and `bb` binaries, and tests substitute a mock.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::artifact::{read_program, CompiledProgram};
use crate::core::flavor::ProofFlavor;
use crate::core::Package;
use crate::util::fs::read_to_string;
use crate::util::process::ProcessBuilder;

/// Compiler and verifier generator used by a build.
///
/// Implementations are shared across rayon worker threads.
pub trait Toolchain: Sync {
    /// Compile one package to its program.
    fn compile_package(&self, package: &Package) -> Result<CompiledProgram>;

    /// Generate the Solidity verifier source for a compiled artifact.
    ///
    /// `artifact` is the on-disk JSON the program was read from.
    fn generate_verifier(
        &self,
        program: &CompiledProgram,
        artifact: &Path,
        flavor: ProofFlavor,
    ) -> Result<String>;
}

/// Installed `nargo` and `bb` binaries.
#[derive(Debug, Clone)]
pub struct NargoToolchain {
    nargo: PathBuf,
    bb: PathBuf,
}

impl NargoToolchain {
    pub fn new(nargo: impl Into<PathBuf>, bb: impl Into<PathBuf>) -> Self {
        NargoToolchain {
            nargo: nargo.into(),
            bb: bb.into(),
        }
    }

    pub fn nargo(&self) -> &Path {
        &self.nargo
    }

    pub fn bb(&self) -> &Path {
        &self.bb
    }

    /// Commands that write `<out>/Verifier.sol` for `artifact` in `flavor`.
    fn verifier_commands(
        &self,
        artifact: &Path,
        out: &Path,
        flavor: ProofFlavor,
    ) -> Vec<ProcessBuilder> {
        let vk = out.join("vk");
        let sol = out.join("Verifier.sol");

        match flavor {
            ProofFlavor::UltraKeccakHonk => vec![
                ProcessBuilder::new(&self.bb)
                    .args(["write_vk", "--scheme", "ultra_honk", "--oracle_hash", "keccak", "-b"])
                    .arg(artifact)
                    .arg("-o")
                    .arg(out),
                ProcessBuilder::new(&self.bb)
                    .args(["write_solidity_verifier", "--scheme", "ultra_honk", "-k"])
                    .arg(&vk)
                    .arg("-o")
                    .arg(&sol),
            ],
            ProofFlavor::UltraPlonk => vec![
                ProcessBuilder::new(&self.bb)
                    .args(["write_vk", "-b"])
                    .arg(artifact)
                    .arg("-o")
                    .arg(&vk),
                ProcessBuilder::new(&self.bb)
                    .args(["contract", "-k"])
                    .arg(&vk)
                    .arg("-o")
                    .arg(&sol),
            ],
        }
    }
}

impl Toolchain for NargoToolchain {
    fn compile_package(&self, package: &Package) -> Result<CompiledProgram> {
        let out = TempDir::new().context("failed to create temporary directory")?;

        ProcessBuilder::new(&self.nargo)
            .arg("compile")
            .arg("--program-dir")
            .arg(package.root())
            .arg("--target-dir")
            .arg(out.path())
            .cwd(package.root())
            .exec_and_check()?;

        read_program(&out.path().join(package.artifact_file_name()), package.name())
    }

    fn generate_verifier(
        &self,
        _program: &CompiledProgram,
        artifact: &Path,
        flavor: ProofFlavor,
    ) -> Result<String> {
        let out = TempDir::new().context("failed to create temporary directory")?;

        for cmd in self.verifier_commands(artifact, out.path(), flavor) {
            cmd.exec_and_check()?;
        }

        read_to_string(&out.path().join("Verifier.sol"))
    }
}
