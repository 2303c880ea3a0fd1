//! Error types for orca-config

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] orca_fs::Error),

    #[error("Profile '{name}' not found in config (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("Could not determine a data directory; set ORCASYNC_DATA_DIR")]
    NoDataDir,
}
