//! Configuration for OrcaSync
//!
//! Loads `orcasync-config.yaml`, resolves the active profile and the current
//! platform's profile paths, and decides where the sync repository lives.
//! The engine in `orca-git` only ever sees the resolved plain path lists.

pub mod config;
pub mod error;
pub mod platform;
pub mod schema;

pub use config::{CONFIG_FILE_NAME, Config, find_config_file, repository_path};
pub use error::{Error, Result};
pub use platform::{DiscoveredPaths, Platform, StandardPaths, discover_in, discover_profile_paths};
pub use schema::{ConfigFile, PlatformPaths, Profile};
