//! Command implementations

pub mod artifact;
pub mod build;
pub mod check;
pub mod clean;
pub mod completions;
pub mod install;
pub mod new;
pub mod sources;
