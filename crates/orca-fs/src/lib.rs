//! Filesystem primitives for OrcaSync
//!
//! Provides normalized path handling, full-replace tree copies and
//! atomic configuration I/O.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod tree;

pub use config::ConfigStore;
pub use constants::SyncPath;
pub use error::{Error, Result};
pub use path::{NormalizedPath, mapping_name};
pub use tree::{list_files, replace_tree};
