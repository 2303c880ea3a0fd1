//! Init command implementation
//!
//! Writes the configuration file and prepares the local sync repository on
//! this machine's branch.

use colored::Colorize;
use orca_config::{Config, DiscoveredPaths, discover_profile_paths, repository_path};

use crate::cli::ConfigArgs;
use crate::context::SyncContext;
use crate::error::Result;
use crate::interactive::{self, InitAnswers};

/// Flags for `orcasync init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub non_interactive: bool,
    pub remote: Option<String>,
    pub name: Option<String>,
}

/// Run the init command
pub fn run_init(args: &ConfigArgs, options: &InitOptions) -> Result<()> {
    let mut config = Config::load(args.config.as_deref(), args.profile.as_deref())?;

    if config.exists() && !options.non_interactive {
        let prompt = format!(
            "Config file already exists at {}. Overwrite?",
            config.path().display()
        );
        if !interactive::confirm(&prompt, false)? {
            println!("{}", "Initialization cancelled.".yellow());
            return Ok(());
        }
    }

    println!("{}", "OrcaSync Initialization".bold());
    println!();
    println!("{} Discovering OrcaSlicer installation...", "=>".blue().bold());
    let discovered = discover_profile_paths();
    print_discovered(&discovered);

    let answers = if options.non_interactive {
        InitAnswers {
            remote_url: options
                .remote
                .clone()
                .unwrap_or_else(|| config.repository_url().to_string()),
            repository_name: options
                .name
                .clone()
                .unwrap_or_else(|| config.repository_name().to_string()),
            custom_user_path: None,
        }
    } else {
        interactive::interactive_init(&config)?
    };

    apply_answers(&mut config, &answers, &discovered)?;
    config.save()?;
    println!(
        "{} Configuration saved to {}",
        "OK".green().bold(),
        config.path().display()
    );

    let repo_path = repository_path(&config)?;
    init_repository(&SyncContext::new(config, repo_path))
}

/// Fold the answers into `config`.
///
/// A custom user path replaces the configured ones. Otherwise the first
/// discovered `user` and `system` directories are used, if any were found;
/// one of each, since every synced directory needs a distinct leaf name.
pub fn apply_answers(
    config: &mut Config,
    answers: &InitAnswers,
    discovered: &DiscoveredPaths,
) -> Result<()> {
    config.set_repository_url(&answers.remote_url)?;
    if !answers.repository_name.is_empty() {
        config.set_repository_name(&answers.repository_name)?;
    }

    if let Some(custom) = &answers.custom_user_path {
        let system = config.system_paths();
        config.set_sync_paths(std::slice::from_ref(custom), &system)?;
    } else if let Some(user) = discovered.user.first() {
        let system: Vec<_> = discovered.system.first().cloned().into_iter().collect();
        config.set_sync_paths(std::slice::from_ref(user), &system)?;
    }
    Ok(())
}

/// Open (clone or create) the repository and check out the branch.
pub fn init_repository(ctx: &SyncContext) -> Result<()> {
    let (_repo, branch) = ctx.open_on_branch()?;

    println!(
        "{} Repository initialized at {}",
        "OK".green().bold(),
        ctx.repo_path.display()
    );
    println!("{} Branch: {}", "OK".green().bold(), branch.cyan());
    println!();
    println!("{}", "Initialization complete!".green().bold());
    println!(
        "Run {} to upload your profiles or {} to download.",
        "orcasync push".cyan(),
        "orcasync pull".cyan()
    );
    Ok(())
}

fn print_discovered(discovered: &DiscoveredPaths) {
    if discovered.is_empty() {
        println!(
            "{} No OrcaSlicer profiles found in standard locations",
            "!".yellow().bold()
        );
        println!("   You can specify custom paths manually");
    } else {
        println!("{} Found OrcaSlicer profiles:", "OK".green().bold());
        for path in &discovered.user {
            println!("   User:   {}", path.display());
        }
        for path in &discovered.system {
            println!("   System: {}", path.display());
        }
    }
    println!();
}
