//! Test utilities and mocks for noirkit unit tests.
//!
//! [`MockToolchain`] stands in for `nargo` and `bb` so the orchestrator can
//! be exercised without an installed toolchain, and [`WorkspaceFixture`]
//! lays out a project with a Noir workspace on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use noirkit::test_support::{MockToolchain, WorkspaceFixture};
//!
//! #[test]
//! fn test_example() {
//!     let ws = WorkspaceFixture::new().with_package("hasher");
//!     let toolchain = MockToolchain::new();
//!
//!     compile(&ws.config(), &toolchain, &CompileOptions::default()).unwrap();
//!     assert_eq!(toolchain.compile_count(), 1);
//! }
//! ```

pub mod fixtures;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use serde_json::Value;

use crate::builder::Toolchain;
use crate::core::artifact::CompiledProgram;
use crate::core::flavor::ProofFlavor;
use crate::core::Package;
use crate::util::hash::{hash_dir, sha256_str};

pub use fixtures::*;

/// Mock toolchain that records every invocation.
///
/// Compiled bytecode is derived from the package sources, so editing a
/// package changes its artifact and leaves the others untouched.
#[derive(Debug, Default)]
pub struct MockToolchain {
    compiles: AtomicUsize,
    verifiers: AtomicUsize,
    calls: Mutex<Vec<String>>,
    fail_package: Option<String>,
    fail_flavor: Option<ProofFlavor>,
}

impl MockToolchain {
    /// Create a mock that succeeds for every package and flavor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail compilation of the named package.
    pub fn failing_package(mut self, name: impl Into<String>) -> Self {
        self.fail_package = Some(name.into());
        self
    }

    /// Fail verifier generation in the given flavor.
    pub fn failing_flavor(mut self, flavor: ProofFlavor) -> Self {
        self.fail_flavor = Some(flavor);
        self
    }

    /// Number of `compile_package` calls so far.
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    /// Number of `generate_verifier` calls so far.
    pub fn verifier_count(&self) -> usize {
        self.verifiers.load(Ordering::SeqCst)
    }

    /// Every call as `compile <name>` or `verifier <artifact> <flavor>`,
    /// sorted since jobs run in parallel.
    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Toolchain for MockToolchain {
    fn compile_package(&self, package: &Package) -> Result<CompiledProgram> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.record(format!("compile {}", package.name()));

        if self.fail_package.as_deref() == Some(package.name()) {
            bail!("mock compile failure for {}", package.name());
        }

        let sources = hash_dir(&package.root().join("src"), &[])?;
        Ok(CompiledProgram {
            noir_version: Some("1.0.0-beta.3+mock".to_string()),
            hash: Some(Value::from(1u64)),
            abi: serde_json::json!({ "parameters": [], "return_type": null }),
            bytecode: sha256_str(&format!("{}:{}", package.name(), sources)),
            extra: Default::default(),
        })
    }

    fn generate_verifier(
        &self,
        program: &CompiledProgram,
        artifact: &Path,
        flavor: ProofFlavor,
    ) -> Result<String> {
        self.verifiers.fetch_add(1, Ordering::SeqCst);
        let name = crate::core::artifact::artifact_name(artifact);
        self.record(format!("verifier {} {}", name, flavor));

        if self.fail_flavor == Some(flavor) {
            bail!("mock {} failure for {}", flavor, name);
        }

        Ok(format!(
            "// {} verifier for {}\ncontract HonkVerifier {{}}\n",
            flavor, program.bytecode
        ))
    }
}
