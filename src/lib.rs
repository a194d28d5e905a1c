//! noirkit - incremental Noir circuit builds for host build tools
//!
//! This crate provides the core library functionality for noirkit,
//! including workspace discovery, the build cache, compile orchestration
//! and Solidity verifier generation.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for noirkit unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock toolchain and on-disk workspace
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildCache, NargoToolchain, Toolchain, ToolchainInstaller};
pub use core::{CompiledProgram, Package, ProofFlavor, Workspace};
pub use util::config::Config;
pub use util::context::GlobalContext;
pub use util::errors::NoirError;
