//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// OrcaSync - Sync OrcaSlicer profiles using Git
#[derive(Parser, Debug)]
#[command(name = "orcasync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the configuration comes from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Path to the config file
    #[arg(short, long, env = "ORCASYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile name to use
    #[arg(short, long)]
    pub profile: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize OrcaSync configuration and repository
    ///
    /// Examples:
    ///   orcasync init
    ///   orcasync init --non-interactive --remote git@github.com:me/profiles.git
    Init {
        #[command(flatten)]
        config: ConfigArgs,

        /// Skip prompts; take values from flags and discovery
        #[arg(long)]
        non_interactive: bool,

        /// Git repository URL (only with --non-interactive)
        #[arg(long, requires = "non_interactive")]
        remote: Option<String>,

        /// Repository name (only with --non-interactive)
        #[arg(long, requires = "non_interactive")]
        name: Option<String>,
    },

    /// Push local OrcaSlicer profiles to the repository
    Push {
        #[command(flatten)]
        config: ConfigArgs,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Continue without asking when no repository URL is configured
        #[arg(short, long)]
        yes: bool,
    },

    /// Pull OrcaSlicer profiles from the repository
    Pull {
        #[command(flatten)]
        config: ConfigArgs,

        /// Restore profiles even if the pull brought no new commits
        #[arg(short, long)]
        force: bool,
    },

    /// Show OrcaSync status
    Status {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the path to the configuration file
    ConfigPath {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_push_with_message() {
        let cli = Cli::parse_from(["orcasync", "push", "-m", "tuned PLA", "-p", "farm"]);
        assert_eq!(
            cli.command,
            Some(Commands::Push {
                config: ConfigArgs {
                    config: None,
                    profile: Some("farm".into()),
                },
                message: Some("tuned PLA".into()),
                yes: false,
            })
        );
    }

    #[test]
    fn parse_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["orcasync", "pull", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_remote_requires_non_interactive() {
        let result = Cli::try_parse_from(["orcasync", "init", "--remote", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_config_path_command() {
        let cli = Cli::parse_from(["orcasync", "config-path", "-c", "/tmp/o.yaml"]);
        assert_eq!(
            cli.command,
            Some(Commands::ConfigPath {
                config: ConfigArgs {
                    config: Some(PathBuf::from("/tmp/o.yaml")),
                    profile: None,
                },
            })
        );
    }
}
