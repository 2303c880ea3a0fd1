//! Simulated machines with OrcaSlicer-style profile directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary "machine": a home for the sync repository plus profile
/// directories that play the role of OrcaSlicer's `user`/`system` folders.
pub struct Machine {
    dir: TempDir,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Machine: temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Where this machine keeps its sync repository.
    pub fn repo_path(&self) -> PathBuf {
        self.root().join("data/orcasync/orca-profiles")
    }

    /// A profile directory with the given leaf name, e.g. `user`.
    pub fn profile_dir(&self, leaf: &str) -> PathBuf {
        self.root().join("OrcaSlicer").join(leaf)
    }
}

/// Write `content` to `dir/rel`, creating parents.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_profile(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().expect("profile file has a parent"))
        .unwrap_or_else(|e| panic!("write_profile: {e}"));
    fs::write(&path, content).unwrap_or_else(|e| panic!("write_profile: {e}"));
}
