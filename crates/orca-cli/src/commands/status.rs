//! Status command implementation

use colored::Colorize;
use orca_git::{CommitInfo, RepoStatus, SyncRepository};
use serde_json::json;

use crate::context::SyncContext;
use crate::error::Result;

const RECENT_COMMITS: usize = 5;

/// Run the status command
pub fn run_status(ctx: &SyncContext, json: bool) -> Result<()> {
    let repo = if ctx.repo_path.exists() {
        match SyncRepository::open(&ctx.repo_path, Some(ctx.config.repository_url())) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!(path = %ctx.repo_path.display(), error = %e, "Repository status unavailable");
                None
            }
        }
    } else {
        None
    };

    let status = repo.as_ref().map(SyncRepository::status).transpose()?;
    let commits = match (&repo, status.as_ref().and_then(|s| s.branch.as_deref())) {
        (Some(repo), Some(branch)) => repo.recent_commits(branch, RECENT_COMMITS)?,
        _ => Vec::new(),
    };

    if json {
        print_json(ctx, status.as_ref(), &commits)
    } else {
        print_human(ctx, status.as_ref(), &commits);
        Ok(())
    }
}

fn print_json(ctx: &SyncContext, status: Option<&RepoStatus>, commits: &[CommitInfo]) -> Result<()> {
    let config = &ctx.config;
    let repository = status.map(|s| {
        json!({
            "path": ctx.repo_path.display().to_string(),
            "branch": s.branch,
            "dirty": s.dirty,
            "untracked": s.untracked,
            "has_remote": s.has_remote,
            "synced_files": s.synced_files,
            "recent_commits": commits
                .iter()
                .map(|c| json!({
                    "hash": c.hash,
                    "message": c.message,
                    "author": c.author,
                    "timestamp": c.timestamp.to_rfc3339(),
                }))
                .collect::<Vec<_>>(),
        })
    });

    let output = json!({
        "config_file": config.path().display().to_string(),
        "active_profile": config.active_profile_name(),
        "profiles": config.list_profiles(),
        "repository_url": config.repository_url(),
        "branch": config.branch_name(),
        "user_paths": config.user_paths().iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "system_paths": config.system_paths().iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "repository": repository,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_human(ctx: &SyncContext, status: Option<&RepoStatus>, commits: &[CommitInfo]) {
    let config = &ctx.config;

    println!("{}", "OrcaSync Status".bold());
    println!();
    println!("{}:        {}", "Config File".dimmed(), config.path().display());
    println!(
        "{}:     {}",
        "Active Profile".dimmed(),
        config
            .active_profile_name()
            .map(|p| p.cyan().to_string())
            .unwrap_or_else(|| "None (using global settings)".dimmed().to_string())
    );
    let profiles = config.list_profiles();
    println!(
        "{}: {}",
        "Available Profiles".dimmed(),
        if profiles.is_empty() {
            "None".dimmed().to_string()
        } else {
            profiles.join(", ")
        }
    );
    println!(
        "{}:     {}",
        "Repository URL".dimmed(),
        if config.repository_url().is_empty() {
            "Not configured".dimmed().to_string()
        } else {
            config.repository_url().cyan().to_string()
        }
    );
    println!("{}:        {}", "Branch Name".dimmed(), config.branch_name().cyan());
    println!("{}:", "Sync Paths".dimmed());
    for path in config.sync_paths() {
        let marker = if path.is_dir() { "+".green() } else { "-".red() };
        println!("  {} {}", marker, path.display());
    }
    println!();

    let Some(status) = status else {
        println!(
            "{} Repository not initialized. Run {}.",
            "!".yellow().bold(),
            "orcasync init".cyan()
        );
        return;
    };

    println!("{}", "Repository Status".bold());
    println!();
    println!("{}:   {}", "Repository Path".dimmed(), ctx.repo_path.display());
    println!(
        "{}:    {}",
        "Current Branch".dimmed(),
        status.branch.as_deref().unwrap_or("N/A").cyan()
    );
    println!(
        "{}:       {}",
        "Has Changes".dimmed(),
        if status.dirty { "Yes".yellow() } else { "No".green() }
    );
    println!("{}:   {}", "Untracked Files".dimmed(), status.untracked);
    println!("{}:      {}", "Synced Files".dimmed(), status.synced_files);
    println!(
        "{}: {}",
        "Remote Configured".dimmed(),
        if status.has_remote { "Yes".green() } else { "No".yellow() }
    );

    if !commits.is_empty() {
        println!();
        println!("{}:", "Recent Commits".bold());
        for commit in commits {
            println!(
                "  {} {} {}",
                commit.hash.yellow(),
                commit.message,
                format!("({}, {})", commit.author, commit.timestamp.format("%Y-%m-%d %H:%M")).dimmed()
            );
        }
    }
}
