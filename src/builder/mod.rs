//! Noir build machinery.
//!
//! This module implements the build cache, the toolchain driver and the
//! toolchain installer.

pub mod cache;
pub mod install;
pub mod toolchain;

pub use cache::BuildCache;
pub use install::ToolchainInstaller;
pub use toolchain::{NargoToolchain, Toolchain};
