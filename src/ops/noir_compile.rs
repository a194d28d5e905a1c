//! Implementation of the incremental Noir compile.
//!
//! Circuits are recompiled only when the workspace sources changed, and
//! verifiers are regenerated only for artifacts whose content changed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use rayon::prelude::*;

use crate::builder::{BuildCache, Toolchain};
use crate::core::artifact::{artifact_name, artifact_path, artifact_paths, read_program};
use crate::core::flavor::{verifier_file_name, ProofFlavor};
use crate::core::workspace::{check_workspace, ensure_gitignore, Workspace};
use crate::ops::host::HostTool;
use crate::util::config::Config;
use crate::util::fs::{ensure_dir, write_string};

/// Options for the compile step.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Ignore the build cache
    pub force: bool,
}

/// What a compile did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Packages compiled, in workspace order
    pub compiled: Vec<String>,

    /// Verifiers written, sorted
    pub generated: Vec<PathBuf>,

    /// Artifacts whose verifiers were up to date
    pub skipped: Vec<PathBuf>,
}

impl CompileReport {
    /// Whether nothing had to be rebuilt.
    pub fn is_fresh(&self) -> bool {
        self.compiled.is_empty() && self.generated.is_empty()
    }
}

enum ArtifactOutcome {
    Skipped(PathBuf),
    Generated(Vec<PathBuf>),
}

/// Bring compiled artifacts and verifiers in the target directory up to
/// date with the Noir workspace.
pub fn compile(
    config: &Config,
    toolchain: &dyn Toolchain,
    opts: &CompileOptions,
) -> Result<CompileReport> {
    let root = &config.noir_dir;
    let target_dir = config.target_dir();

    check_workspace(root, config.noir.skip_nargo_workspace_check)?;
    ensure_gitignore(root)?;

    let mut cache = BuildCache::load(config);
    let mut report = CompileReport::default();

    if opts.force || cache.has_source_changed()? {
        report.compiled = compile_packages(root, &target_dir, toolchain)?;
        cache.commit_source_hash()?;
    } else {
        tracing::debug!("Noir sources unchanged, skipping compilation");
    }

    let flavors: Vec<ProofFlavor> = ProofFlavor::ALL
        .into_iter()
        .filter(|f| config.noir.flavor.contains(f))
        .collect();

    let artifacts = artifact_paths(&target_dir)?;
    let cache = Mutex::new(cache);

    let outcomes: Vec<Result<ArtifactOutcome>> = artifacts
        .par_iter()
        .map(|artifact| {
            generate_verifiers(artifact, &target_dir, &flavors, toolchain, &cache, opts.force)
        })
        .collect();

    for outcome in outcomes {
        match outcome? {
            ArtifactOutcome::Skipped(path) => report.skipped.push(path),
            ArtifactOutcome::Generated(paths) => report.generated.extend(paths),
        }
    }
    report.generated.sort();

    Ok(report)
}

/// Compile the Noir workspace, then run the host compile command.
pub fn build(
    config: &Config,
    toolchain: &dyn Toolchain,
    opts: &CompileOptions,
) -> Result<CompileReport> {
    let host = HostTool::from_config(config)?;
    let report = compile(config, toolchain, opts)?;
    host.run_compile()?;
    Ok(report)
}

/// Compile every workspace package and write its artifact.
///
/// Nothing is written unless every package compiled.
fn compile_packages(
    root: &Path,
    target_dir: &Path,
    toolchain: &dyn Toolchain,
) -> Result<Vec<String>> {
    let ws = Workspace::load(root)?;
    if ws.is_empty() {
        tracing::info!("No Noir packages in {}", root.display());
        return Ok(Vec::new());
    }

    tracing::info!("Compiling {} Noir circuit(s)", ws.packages().len());

    let results: Vec<Result<_>> = ws
        .packages()
        .par_iter()
        .map(|package| toolchain.compile_package(package))
        .collect();
    let programs = results.into_iter().collect::<Result<Vec<_>>>()?;

    ensure_dir(target_dir)?;
    let mut compiled = Vec::with_capacity(programs.len());
    for (package, program) in ws.packages().iter().zip(programs) {
        program.write(&artifact_path(target_dir, package.name()))?;
        compiled.push(package.name().to_string());
    }

    Ok(compiled)
}

/// Regenerate the verifiers of one artifact if its content changed.
fn generate_verifiers(
    artifact: &Path,
    target_dir: &Path,
    flavors: &[ProofFlavor],
    toolchain: &dyn Toolchain,
    cache: &Mutex<BuildCache>,
    force: bool,
) -> Result<ArtifactOutcome> {
    let changed = lock(cache)?.has_artifact_changed(artifact)?;
    if !changed && !force {
        return Ok(ArtifactOutcome::Skipped(artifact.to_path_buf()));
    }

    let name = artifact_name(artifact);
    let program = read_program(artifact, &name)?;

    let mut written = Vec::with_capacity(flavors.len());
    for &flavor in flavors {
        tracing::info!("Generating Solidity {} verifier for {}", flavor, name);
        let source = toolchain.generate_verifier(&program, artifact, flavor)?;

        let path = target_dir.join(verifier_file_name(&name, flavor));
        write_string(&path, &source)?;
        written.push(path);
    }

    lock(cache)?.commit_artifact_hash(artifact)?;
    Ok(ArtifactOutcome::Generated(written))
}

fn lock(cache: &Mutex<BuildCache>) -> Result<std::sync::MutexGuard<'_, BuildCache>> {
    cache.lock().map_err(|_| anyhow!("build cache lock poisoned"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cache::CACHE_FILE;
    use crate::test_support::{MockToolchain, WorkspaceFixture};
    use crate::util::errors::NoirError;
    use std::fs;

    fn run(
        ws: &WorkspaceFixture,
        toolchain: &MockToolchain,
        force: bool,
    ) -> Result<CompileReport> {
        compile(&ws.config(), toolchain, &CompileOptions { force })
    }

    fn cached_hash(config: &Config, artifact: &str) -> String {
        let cache = BuildCache::load(config);
        let (_, hash) = cache
            .record()
            .json_files
            .iter()
            .find(|(path, _)| path.ends_with(artifact))
            .unwrap();
        hash.clone()
    }

    #[test]
    fn test_compile_writes_artifacts_and_verifiers() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_package("bar")
            .with_members(&["foo", "bar"]);
        let toolchain = MockToolchain::new();

        let report = run(&ws, &toolchain, false).unwrap();

        assert_eq!(report.compiled, vec!["foo", "bar"]);
        assert_eq!(
            report.generated,
            vec![ws.target_dir().join("bar.sol"), ws.target_dir().join("foo.sol")]
        );
        assert!(ws.target_dir().join("foo.json").exists());
        assert!(ws.noir_dir().join(".gitignore").exists());
        assert!(ws.config().cache_dir.join(CACHE_FILE).exists());
    }

    #[test]
    fn test_second_compile_is_noop() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_members(&["foo"]);
        let toolchain = MockToolchain::new();

        run(&ws, &toolchain, false).unwrap();
        assert_eq!(toolchain.compile_count(), 1);
        assert_eq!(toolchain.verifier_count(), 1);

        let report = run(&ws, &toolchain, false).unwrap();
        assert!(report.is_fresh());
        assert_eq!(report.skipped, vec![ws.target_dir().join("foo.json")]);
        assert_eq!(toolchain.compile_count(), 1);
        assert_eq!(toolchain.verifier_count(), 1);
    }

    #[test]
    fn test_force_rebuilds_everything() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_members(&["foo"]);
        let toolchain = MockToolchain::new();

        run(&ws, &toolchain, false).unwrap();
        let report = run(&ws, &toolchain, true).unwrap();

        assert_eq!(report.compiled, vec!["foo"]);
        assert_eq!(toolchain.compile_count(), 2);
        assert_eq!(toolchain.verifier_count(), 2);
    }

    #[test]
    fn test_only_changed_artifacts_regenerate() {
        let ws = WorkspaceFixture::new()
            .with_package("a")
            .with_package("b")
            .with_members(&["a", "b"]);
        let toolchain = MockToolchain::new();
        run(&ws, &toolchain, false).unwrap();

        let config = ws.config();
        let b_sol = ws.target_dir().join("b.sol");
        let a_hash = cached_hash(&config, "a.json");
        let b_hash = cached_hash(&config, "b.json");

        // A regenerated b.sol would overwrite this marker.
        fs::write(&b_sol, "// untouched").unwrap();

        ws.edit_source("a", "fn main(x: Field) { assert(x == 1); }");
        let report = run(&ws, &toolchain, false).unwrap();

        // Every package recompiles, but only `a` produced a new artifact.
        assert_eq!(toolchain.compile_count(), 4);
        assert_eq!(report.generated, vec![ws.target_dir().join("a.sol")]);
        assert_eq!(report.skipped, vec![ws.target_dir().join("b.json")]);

        assert_eq!(fs::read_to_string(&b_sol).unwrap(), "// untouched");
        assert_eq!(cached_hash(&config, "b.json"), b_hash);
        assert_ne!(cached_hash(&config, "a.json"), a_hash);
    }

    #[test]
    fn test_flavor_naming() {
        let ws = WorkspaceFixture::new()
            .with_noir_settings("flavor = [\"ultra_plonk\", \"ultra_keccak_honk\"]")
            .with_package("foo")
            .with_members(&["foo"]);
        let toolchain = MockToolchain::new();

        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(
            report.generated,
            vec![
                ws.target_dir().join("foo.sol"),
                ws.target_dir().join("foo_ultra_plonk.sol"),
            ]
        );
        let plonk = fs::read_to_string(ws.target_dir().join("foo_ultra_plonk.sol")).unwrap();
        assert!(plonk.starts_with("// ultra_plonk verifier"));
    }

    #[test]
    fn test_empty_workspace() {
        let ws = WorkspaceFixture::new().with_members(&[]);
        let toolchain = MockToolchain::new();

        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(report, CompileReport::default());
        assert_eq!(toolchain.compile_count(), 0);
    }

    #[test]
    fn test_compile_failure_keeps_cache_stale() {
        let ws = WorkspaceFixture::new()
            .with_package("good")
            .with_package("bad")
            .with_members(&["good", "bad"]);

        let failing = MockToolchain::new().failing_package("bad");
        assert!(run(&ws, &failing, false).is_err());
        assert!(!ws.target_dir().join("good.json").exists());

        let toolchain = MockToolchain::new();
        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(report.compiled.len(), 2);
    }

    #[test]
    fn test_flavor_failure_aborts_artifact() {
        let ws = WorkspaceFixture::new()
            .with_noir_settings("flavor = [\"ultra_keccak_honk\", \"ultra_plonk\"]")
            .with_package("foo")
            .with_members(&["foo"]);

        let failing = MockToolchain::new().failing_flavor(ProofFlavor::UltraKeccakHonk);
        assert!(run(&ws, &failing, false).is_err());
        assert_eq!(failing.calls(), vec!["compile foo", "verifier foo ultra_keccak_honk"]);
        assert!(!ws.target_dir().join("foo_ultra_plonk.sol").exists());

        // The artifact hash was not committed, so verifiers are retried.
        let toolchain = MockToolchain::new();
        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(toolchain.compile_count(), 0);
        assert_eq!(report.generated.len(), 2);
    }

    #[test]
    fn test_missing_members_fail_before_compiling() {
        let ws = WorkspaceFixture::new()
            .with_package("a")
            .with_package("b")
            .with_package("c")
            .with_members(&["a", "b"]);
        let toolchain = MockToolchain::new();

        let err = run(&ws, &toolchain, false).unwrap_err();
        match err.downcast_ref::<NoirError>() {
            Some(NoirError::Config { items, .. }) => assert_eq!(items, &vec!["c".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(toolchain.calls().is_empty());
    }

    #[test]
    fn test_missing_root_manifest_is_created() {
        let ws = WorkspaceFixture::new().with_package("a");
        let toolchain = MockToolchain::new();

        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(report.compiled, vec!["a"]);
        assert!(ws.noir_dir().join("Nargo.toml").exists());
    }

    #[test]
    fn test_tooling_change_regenerates() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_members(&["foo"]);
        let toolchain = MockToolchain::new();
        run(&ws, &toolchain, false).unwrap();

        let ws = ws.with_noir_settings("bb_version = \"0.84.0\"");
        run(&ws, &toolchain, false).unwrap();
        assert_eq!(toolchain.compile_count(), 2);
        assert_eq!(toolchain.verifier_count(), 2);
    }

    #[test]
    fn test_corrupt_cache_recompiles() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_members(&["foo"]);
        let toolchain = MockToolchain::new();
        run(&ws, &toolchain, false).unwrap();

        fs::write(ws.config().cache_dir.join(CACHE_FILE), "{\"sourceFiles\": 1}").unwrap();
        let report = run(&ws, &toolchain, false).unwrap();
        assert_eq!(report.compiled, vec!["foo"]);
    }

    #[test]
    fn test_artifact_without_bytecode_is_parse_error() {
        let ws = WorkspaceFixture::new().with_members(&[]);
        fs::create_dir_all(ws.target_dir()).unwrap();
        fs::write(ws.target_dir().join("stray.json"), "{\"abi\": {}}").unwrap();

        let err = run(&ws, &MockToolchain::new(), false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NoirError>(),
            Some(NoirError::ArtifactParse { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_runs_host_compile_after_noir() {
        let ws = WorkspaceFixture::new()
            .with_package("foo")
            .with_members(&["foo"]);
        let mut config = ws.config();
        config.host.compile = Some(vec![
            "sh".into(),
            "-c".into(),
            "test -f noir/target/foo.sol && touch host-compiled".into(),
        ]);

        build(&config, &MockToolchain::new(), &CompileOptions::default()).unwrap();
        assert!(ws.root().join("host-compiled").exists());
    }
}
