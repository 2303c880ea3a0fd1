//! Command implementations for orca-cli

pub mod config_path;
pub mod init;
pub mod pull;
pub mod push;
pub mod status;

pub use config_path::run_config_path;
pub use init::{InitOptions, run_init};
pub use pull::run_pull;
pub use push::run_push;
pub use status::run_status;
