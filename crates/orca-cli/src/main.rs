//! OrcaSync CLI
//!
//! Synchronizes OrcaSlicer profile directories across machines through a
//! shared git repository, one branch per machine.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use commands::InitOptions;
use context::SyncContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} OrcaSlicer profile sync", "orcasync".green().bold());
            println!();
            println!("Run {} for available commands.", "orcasync --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr: DEBUG with `--verbose`, otherwise `RUST_LOG` or warn.
fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    if let Err(e) = result {
        eprintln!("{}: failed to set tracing subscriber: {}", "warning".yellow(), e);
    } else if verbose {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init {
            config,
            non_interactive,
            remote,
            name,
        } => commands::run_init(
            &config,
            &InitOptions {
                non_interactive,
                remote,
                name,
            },
        ),
        Commands::Push {
            config,
            message,
            yes,
        } => commands::run_push(&SyncContext::load(&config)?, message.as_deref(), yes),
        Commands::Pull { config, force } => {
            commands::run_pull(&SyncContext::load(&config)?, force)
        }
        Commands::Status { config, json } => {
            commands::run_status(&SyncContext::load(&config)?, json)
        }
        Commands::ConfigPath { config } => commands::run_config_path(&config),
    }
}
