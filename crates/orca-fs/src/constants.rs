//! Well-known names inside a sync repository.

use std::path::Path;

/// Fixed names that make up the on-disk layout of a sync repository.
///
/// These are persisted conventions: existing repositories rely on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The `profiles` directory holding one subtree per mapping
    ProfilesDir,
    /// The `.git` directory (Git database)
    GitDir,
    /// The `README.md` marker written by the bootstrap commit
    Readme,
}

impl SyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfilesDir => "profiles",
            Self::GitDir => ".git",
            Self::Readme => "README.md",
        }
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
