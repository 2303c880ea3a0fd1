//! Config-path command implementation

use orca_config::Config;

use crate::cli::ConfigArgs;
use crate::error::Result;

/// Print the configuration file in use, whether or not it exists yet.
pub fn run_config_path(args: &ConfigArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref(), args.profile.as_deref())?;
    println!("{}", config.path().display());
    Ok(())
}
