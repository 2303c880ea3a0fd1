//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Configuration files written on Windows and read on Linux (or the other
/// way round) carry foreign separators; normalizing keeps leaf-name and
/// extension extraction consistent. Conversion back to a platform path only
/// happens at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Platform path for handing to `std::fs`.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the last path component, ignoring trailing separators.
    ///
    /// Returns `None` for roots and empty paths.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != ".." && !name.ends_with(':'))
    }

    /// Extension of the last component; dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }
}

/// Name of the managed subtree an external directory maps to.
///
/// This is the directory's leaf name: `~/.config/OrcaSlicer/user` maps to
/// `profiles/user`.
pub fn mapping_name(path: &Path) -> Result<String> {
    NormalizedPath::new(path)
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| Error::NoLeafName {
            path: path.to_path_buf(),
        })
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}
