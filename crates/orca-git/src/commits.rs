//! Staging, committing and recent history.

use chrono::{DateTime, Local, TimeZone, Utc};
use git2::{IndexAddOption, StatusOptions};

use crate::repository::SyncRepository;
use crate::Result;

/// Information about a single commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    pub author: String,

    pub timestamp: DateTime<Utc>,
}

/// Hostname of this machine, or `"unknown"` if it cannot be read.
pub fn machine_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Commit message used when the caller supplies none.
pub fn default_message(hostname: &str, at: DateTime<Local>) -> String {
    format!("Sync from {} - {}", hostname, at.format("%Y-%m-%d %H:%M:%S"))
}

impl SyncRepository {
    /// Stage every change and commit it.
    ///
    /// Returns `false` without committing when nothing differs from HEAD
    /// and there are no untracked files. A missing or blank `message` is
    /// replaced by [`default_message`].
    pub fn commit(&mut self, message: Option<&str>) -> Result<bool> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        if !self.has_pending_changes()? {
            tracing::debug!("Nothing to commit");
            return Ok(false);
        }

        let message = match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => default_message(&machine_hostname(), Local::now()),
        };

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let sig = self.signature()?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &parents)?;
        tracing::info!(commit = %oid, %message, "Committed changes");
        Ok(true)
    }

    fn has_pending_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        Ok(!self.repo.statuses(Some(&mut options))?.is_empty())
    }

    /// The last `max_count` commits reachable from `branch`, newest first.
    pub fn recent_commits(&self, branch: &str, max_count: usize) -> Result<Vec<CommitInfo>> {
        let reference = match self.repo.find_reference(&format!("refs/heads/{branch}")) {
            Ok(r) => r,
            Err(_) => self.repo.find_reference(branch)?,
        };
        let tip = reference.peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip.id())?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

        let mut commits = Vec::with_capacity(max_count);
        for oid_result in revwalk.take(max_count) {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let timestamp = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_default();
            let message = commit
                .message()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            let author = commit.author().name().unwrap_or("Unknown").to_string();

            commits.push(CommitInfo {
                hash: format!("{:.7}", oid),
                message,
                author,
                timestamp,
            });
        }

        Ok(commits)
    }
}
