//! Core data structures for noirkit.
//!
//! This module contains the foundational types used throughout noirkit:
//! - Nargo manifests and workspace discovery
//! - Packages and their compiled artifacts
//! - Proof flavors

pub mod artifact;
pub mod flavor;
pub mod manifest;
pub mod package;
pub mod workspace;

pub use artifact::CompiledProgram;
pub use flavor::ProofFlavor;
pub use manifest::{NargoManifest, MANIFEST_NAME};
pub use package::Package;
pub use workspace::{Workspace, WorkspaceCheck};
