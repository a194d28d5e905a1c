//! High-level operations.
//!
//! This module contains the implementation of noirkit commands.

pub mod host;
pub mod noir_clean;
pub mod noir_compile;
pub mod noir_new;

pub use host::{source_paths, HostTool};
pub use noir_clean::clean;
pub use noir_compile::{build, compile, CompileOptions, CompileReport};
pub use noir_new::{add_workspace_member, new_package, NewOptions};
