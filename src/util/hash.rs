//! Hashing utilities for checksums and fingerprinting.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_bytes(s.as_bytes())
}

/// Compute SHA256 hash of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash every file under `root` into a single tree fingerprint.
///
/// Files are keyed by their `/`-separated path relative to `root` and folded
/// in sorted key order, so the result does not depend on the order the
/// filesystem yields directory entries. Top-level entries named in `exclude`
/// (e.g. the `target` output directory) are skipped entirely.
///
/// Symlinks are followed: a linked file is hashed by its target's content
/// under the link's own path. A missing `root` hashes as the empty tree.
pub fn hash_dir(root: &Path, exclude: &[&str]) -> Result<String> {
    let mut entries: Vec<(String, String)> = Vec::new();

    if root.exists() {
        let walker = WalkDir::new(root).follow_links(true).into_iter();
        let walker = walker.filter_entry(|e| {
            if e.depth() != 1 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !exclude.iter().any(|x| *x == name)
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if is_dangling_or_loop(&err) => {
                    tracing::debug!("skipping unhashable link: {}", err);
                    continue;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("failed to walk directory: {}", root.display()))
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");

            entries.push((key, sha256_file(entry.path())?));
        }
    }

    entries.sort();

    let mut fp = Fingerprint::new();
    for (path, hash) in &entries {
        fp.update_str(path).update_str(hash);
    }
    Ok(fp.finish())
}

/// Symlink cycles and links to missing targets carry no content to hash.
fn is_dangling_or_loop(err: &walkdir::Error) -> bool {
    if err.loop_ancestor().is_some() {
        return true;
    }
    let dangling = err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound);
    dangling && err.path().is_some_and(|p| p.is_symlink())
}

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
