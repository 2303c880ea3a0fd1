//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based prompts.

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{Confirm, Input};
use orca_config::Config;

use crate::error::Result;

/// Answers collected by `orcasync init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAnswers {
    pub remote_url: String,
    pub repository_name: String,
    /// A custom user profile directory, when the user asked for one
    pub custom_user_path: Option<PathBuf>,
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Run the `init` prompts, offering `config`'s current values as defaults.
pub fn interactive_init(config: &Config) -> Result<InitAnswers> {
    let remote_url: String = Input::new()
        .with_prompt("Git repository URL (leave empty for local-only)")
        .with_initial_text(config.repository_url())
        .allow_empty(true)
        .interact_text()?;

    let repository_name: String = Input::new()
        .with_prompt("Repository name")
        .default(config.repository_name().to_string())
        .interact_text()?;

    let custom_user_path = if confirm("Use custom OrcaSlicer profile paths?", false)? {
        let current = config
            .user_paths()
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let path: String = Input::new()
            .with_prompt("User profile path")
            .default(current)
            .interact_text()?;
        Some(PathBuf::from(path.trim()))
    } else {
        None
    };

    println!();
    println!("{}", "Summary:".bold());
    if remote_url.trim().is_empty() {
        println!("  {}: {}", "Remote".dimmed(), "(local only)".dimmed());
    } else {
        println!("  {}: {}", "Remote".dimmed(), remote_url.cyan());
    }
    println!("  {}: {}", "Repository".dimmed(), repository_name.cyan());
    if let Some(path) = &custom_user_path {
        println!("  {}: {}", "User path".dimmed(), path.display().to_string().cyan());
    }
    println!();

    Ok(InitAnswers {
        remote_url: remote_url.trim().to_string(),
        repository_name: repository_name.trim().to_string(),
        custom_user_path,
    })
}
