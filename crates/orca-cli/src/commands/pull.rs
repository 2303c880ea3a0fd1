//! Pull command implementation

use colored::Colorize;

use crate::context::SyncContext;
use crate::error::{CliError, Result};

/// Run the pull workflow: pull the branch, then restore profiles.
///
/// Profiles are restored when the pull brought new commits, when the
/// repository was cloned by this run, or when `force` is set.
pub fn run_pull(ctx: &SyncContext, force: bool) -> Result<()> {
    if !ctx.has_remote_url() {
        return Err(CliError::user(
            "No repository URL configured. Run 'orcasync init' first.",
        ));
    }

    let fresh = !ctx.repo_path.exists();
    let (mut repo, branch) = ctx.open_on_branch()?;
    println!(
        "{} Pulling profiles on branch {}...",
        "=>".blue().bold(),
        branch.cyan()
    );

    let outcome = repo.pull(&branch)?;
    if outcome.had_changes {
        println!(
            "{} Pulled {} changed files",
            "OK".green().bold(),
            outcome.changed_paths.len()
        );
        for path in &outcome.changed_paths {
            tracing::debug!(%path, "Changed by pull");
        }
    } else {
        println!("{}", "No changes to pull".yellow());
    }

    if outcome.had_changes || fresh || force {
        let restored = repo.pull_tree(&ctx.config.sync_paths())?;
        println!(
            "{} Restored {} files to OrcaSlicer",
            "OK".green().bold(),
            restored.len()
        );
    }

    println!();
    println!("{}", "Pull complete!".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orca_config::{Config, ConfigFile, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_pull_without_remote_is_user_error() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(
            dir.path().join("c.yaml"),
            ConfigFile::default(),
            None,
            Platform::current(),
        )
        .unwrap();
        let ctx = SyncContext::new(config, dir.path().join("store"));

        let err = run_pull(&ctx, false).unwrap_err();

        assert!(matches!(err, CliError::User { .. }));
        assert!(err.to_string().contains("orcasync init"));
        assert!(!dir.path().join("store").exists());
    }
}
