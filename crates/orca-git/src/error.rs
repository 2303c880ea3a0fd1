//! Error types for orca-git

use std::path::PathBuf;

use crate::classify::{self, ErrorKind};

/// Result type for orca-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in orca-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] orca_fs::Error),

    #[error("Repository not initialized: {message}")]
    NotInitialized { message: String },

    #[error("Not a valid git repository: {path}")]
    InvalidRepository { path: PathBuf },

    #[error("Failed to clone repository from {url}: {message}")]
    Clone { url: String, message: String },

    #[error("No remote '{name}' configured")]
    NoRemote { name: String },

    #[error(
        "Authentication failed. Git cannot prompt for credentials in non-interactive mode.{hints}"
    )]
    Auth { message: String, hints: String },

    #[error("Repository not found: {url}. Make sure it exists and you have access.")]
    NotFound { url: String, message: String },

    #[error("Push rejected (non-fast-forward). Run 'orcasync pull' first to merge remote changes.")]
    NonFastForward { message: String },

    #[error("Failed to {operation}: {message}")]
    Sync { operation: String, message: String },

    #[error("Failed to pull and merge divergent branches: {message}")]
    DivergentHistory { message: String },

    #[error(
        "Sync paths {} and {} both map to 'profiles/{name}'; rename one of them",
        .first.display(),
        .second.display()
    )]
    MappingCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl Error {
    /// Build the user-facing error for a failed network operation.
    ///
    /// `raw` is the backend's message; its classification decides the
    /// variant. Authentication failures get remediation hints for the
    /// platform this process runs on.
    pub fn remote(operation: &str, url: &str, raw: &str) -> Self {
        match classify::classify(raw) {
            ErrorKind::Auth => Self::Auth {
                message: raw.to_string(),
                hints: classify::auth_hints(std::env::consts::OS),
            },
            ErrorKind::NotFound => Self::NotFound {
                url: url.to_string(),
                message: raw.to_string(),
            },
            ErrorKind::NonFastForward => Self::NonFastForward {
                message: raw.to_string(),
            },
            ErrorKind::Generic => Self::Sync {
                operation: operation.to_string(),
                message: raw.to_string(),
            },
        }
    }

    /// Classification of a remote-layer failure, if this is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Auth { .. } => Some(ErrorKind::Auth),
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::NonFastForward { .. } => Some(ErrorKind::NonFastForward),
            Self::Sync { .. } | Self::Clone { .. } | Self::DivergentHistory { .. } => {
                Some(ErrorKind::Generic)
            }
            _ => None,
        }
    }
}
