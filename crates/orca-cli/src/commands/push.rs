//! Push command implementation

use chrono::Local;
use colored::Colorize;
use orca_git::{PushKind, machine_hostname};

use crate::context::SyncContext;
use crate::error::Result;
use crate::interactive;

/// Run the push workflow: copy profiles in, commit, push.
///
/// Without a configured remote the commit stays local; unless `yes` is set
/// the user is asked first.
pub fn run_push(ctx: &SyncContext, message: Option<&str>, yes: bool) -> Result<()> {
    if !ctx.has_remote_url()
        && !yes
        && !interactive::confirm(
            "No repository URL configured. Continue with local commit only?",
            false,
        )?
    {
        println!("{}", "Push cancelled.".yellow());
        return Ok(());
    }

    let (mut repo, branch) = ctx.open_on_branch()?;
    println!(
        "{} Syncing profiles on branch {}...",
        "=>".blue().bold(),
        branch.cyan()
    );

    let copied = repo.push_tree(&ctx.config.sync_paths())?;
    println!(
        "{} Copied {} files to repository",
        "OK".green().bold(),
        copied.len()
    );

    let message = message.map(str::trim).filter(|m| !m.is_empty());
    if message.is_none() && !ctx.config.auto_commit() {
        println!(
            "{} Auto-commit is disabled; pass {} to commit",
            "!".yellow().bold(),
            "-m <message>".cyan()
        );
        return Ok(());
    }

    let message = match message {
        Some(m) => m.to_string(),
        None => {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            ctx.config.commit_message(&machine_hostname(), &timestamp)
        }
    };

    if !repo.commit(Some(&message))? {
        println!("{}", "No changes to commit".yellow());
        return Ok(());
    }
    println!("{} Changes committed", "OK".green().bold());

    if ctx.has_remote_url() {
        match repo.push(&branch)? {
            PushKind::SetUpstream => println!(
                "{} Pushed to remote repository (tracking origin/{})",
                "OK".green().bold(),
                branch
            ),
            PushKind::Plain => println!("{} Pushed to remote repository", "OK".green().bold()),
        }
    }

    println!();
    println!("{}", "Push complete!".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orca_config::{Config, ConfigFile, Platform};
    use orca_git::SyncRepository;
    use orca_test_utils::{Machine, write_profile};

    fn local_context(machine: &Machine, auto_commit: bool) -> SyncContext {
        let file = ConfigFile {
            auto_commit,
            user_paths: Some(vec![machine.profile_dir("user").display().to_string()]),
            branch_prefix: Some("bench-".into()),
            ..ConfigFile::default()
        };
        let config = Config::from_file(
            machine.root().join("orcasync-config.yaml"),
            file,
            None,
            Platform::current(),
        )
        .unwrap();
        SyncContext::new(config, machine.repo_path())
    }

    #[test]
    fn test_push_local_only_commits_with_message() {
        let machine = Machine::new();
        write_profile(&machine.profile_dir("user"), "filament/PLA.json", "{}");
        let ctx = local_context(&machine, true);

        run_push(&ctx, Some("tuned PLA"), true).unwrap();

        let repo = SyncRepository::open(machine.repo_path(), None).unwrap();
        let head = repo.git().head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("tuned PLA"));
        assert!(machine
            .repo_path()
            .join("profiles/user/filament/PLA.json")
            .is_file());
    }

    #[test]
    fn test_push_twice_without_changes_is_ok() {
        let machine = Machine::new();
        write_profile(&machine.profile_dir("user"), "a.json", "1");
        let ctx = local_context(&machine, true);

        run_push(&ctx, None, true).unwrap();
        let first = SyncRepository::open(machine.repo_path(), None)
            .unwrap()
            .git()
            .head()
            .unwrap()
            .target();

        run_push(&ctx, None, true).unwrap();
        let second = SyncRepository::open(machine.repo_path(), None)
            .unwrap()
            .git()
            .head()
            .unwrap()
            .target();

        assert_eq!(first, second);
    }

    #[test]
    fn test_push_without_auto_commit_only_copies() {
        let machine = Machine::new();
        write_profile(&machine.profile_dir("user"), "a.json", "1");
        let ctx = local_context(&machine, false);

        run_push(&ctx, None, true).unwrap();

        let repo = SyncRepository::open(machine.repo_path(), None).unwrap();
        let head = repo.git().head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("Initial commit"));
        assert!(repo.status().unwrap().untracked > 0);
    }
}
