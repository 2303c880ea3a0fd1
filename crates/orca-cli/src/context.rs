//! Resolved configuration plus repository location for one command.

use std::path::{Path, PathBuf};

use orca_config::{Config, repository_path};
use orca_git::SyncRepository;

use crate::cli::ConfigArgs;
use crate::error::Result;

/// Everything a sync command needs to know before touching git.
#[derive(Debug)]
pub struct SyncContext {
    pub config: Config,
    pub repo_path: PathBuf,
}

impl SyncContext {
    /// Load the configuration named by `args` and locate its repository.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let config = Config::load(args.config.as_deref(), args.profile.as_deref())?;
        let repo_path = repository_path(&config)?;
        tracing::debug!(
            config = %config.path().display(),
            repo = %repo_path.display(),
            "Resolved sync context"
        );
        Ok(Self { config, repo_path })
    }

    pub fn new(config: Config, repo_path: impl AsRef<Path>) -> Self {
        Self {
            config,
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    pub fn has_remote_url(&self) -> bool {
        !self.config.repository_url().trim().is_empty()
    }

    /// Open the repository and check out this machine's branch.
    ///
    /// Returns the repository and the branch name.
    pub fn open_on_branch(&self) -> Result<(SyncRepository, String)> {
        let mut repo = SyncRepository::open(&self.repo_path, Some(self.config.repository_url()))?;
        let branch = self.config.branch_name();
        repo.ensure_branch(&branch)?;
        Ok((repo, branch))
    }
}
