//! Opening, creating and cloning the sync repository.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, Signature, Status, StatusOptions, build::RepoBuilder};
use orca_fs::SyncPath;

use crate::best_effort::attempt;
use crate::commits::machine_hostname;
use crate::credentials;
use crate::{Error, Result};

/// Name of the single remote pointing at the shared store.
pub const ORIGIN: &str = "origin";

const README: &str = "# OrcaSync Profiles\n\nThis repository contains OrcaSlicer profile synchronization data.\n";

/// Open handle on the local sync repository.
///
/// Only [`SyncRepository::open`] constructs one, so every other operation
/// runs against a repository that exists on disk. The handle is owned by a
/// single session; methods that change repository state take `&mut self`.
pub struct SyncRepository {
    pub(crate) repo: Repository,
    pub(crate) path: PathBuf,
    pub(crate) remote_url: Option<String>,
}

/// Snapshot of the repository for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    /// Checked-out branch, `None` when HEAD is detached or unborn
    pub branch: Option<String>,
    /// Tracked files differ from HEAD (staged or not)
    pub dirty: bool,
    /// Files git does not track yet
    pub untracked: usize,
    pub has_remote: bool,
    /// Regular files under `profiles/`
    pub synced_files: usize,
}

impl SyncRepository {
    /// Open the repository at `path`, creating or cloning it when needed.
    ///
    /// - A valid repository is reopened and its `origin` reconciled with
    ///   `remote_url` (updated when different, added when missing).
    /// - A path that exists but is not a repository is removed and
    ///   recreated.
    /// - A missing path is cloned from `remote_url`, or initialised with a
    ///   bootstrap commit when no URL is given.
    ///
    /// An empty `remote_url` is the same as `None`.
    pub fn open(path: impl AsRef<Path>, remote_url: Option<&str>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let remote_url = remote_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        if path.exists() {
            match Repository::open(&path) {
                Ok(repo) => {
                    let mut this = Self {
                        repo,
                        path,
                        remote_url,
                    };
                    this.reconcile_remote()?;
                    this.configure_local();
                    tracing::debug!(path = %this.path.display(), "Opened existing repository");
                    return Ok(this);
                }
                Err(e) if is_not_a_repository(&e) => {
                    let invalid = Error::InvalidRepository { path: path.clone() };
                    tracing::warn!(error = %invalid, "Removing and recreating");
                    remove_invalid(&path)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        match remote_url {
            Some(url) => Self::clone_from(&url, path),
            None => Self::init(path),
        }
    }

    fn clone_from(url: &str, path: PathBuf) -> Result<Self> {
        let mut builder = RepoBuilder::new();
        builder.fetch_options(credentials::fetch_options(git2::Config::open_default().ok()));

        let repo = builder.clone(url, &path).map_err(|e| Error::Clone {
            url: url.to_string(),
            message: e.message().to_string(),
        })?;
        tracing::info!(url, path = %path.display(), "Cloned repository");

        let this = Self {
            repo,
            path,
            remote_url: Some(url.to_string()),
        };
        this.configure_local();
        // A freshly created remote has no commits; give the branch
        // coordinator something to branch from.
        if this.repo.head().is_err() {
            this.bootstrap()?;
        }
        Ok(this)
    }

    fn init(path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&path).map_err(|e| orca_fs::Error::io(&path, e))?;
        let repo = Repository::init(&path)?;
        tracing::info!(path = %path.display(), "Initialized repository");

        let this = Self {
            repo,
            path,
            remote_url: None,
        };
        this.configure_local();
        if this.repo.head().is_err() {
            this.bootstrap()?;
        }
        Ok(this)
    }

    /// Write the README marker and commit it as the first commit.
    fn bootstrap(&self) -> Result<()> {
        let readme = self.path.join(SyncPath::Readme);
        fs::write(&readme, README).map_err(|e| orca_fs::Error::io(&readme, e))?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new(SyncPath::Readme.as_str()))?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let sig = self.signature()?;
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;

        tracing::debug!(path = %self.path.display(), "Created bootstrap commit");
        Ok(())
    }

    fn reconcile_remote(&mut self) -> Result<()> {
        let Some(url) = self.remote_url.clone() else {
            return Ok(());
        };

        let existing = self
            .repo
            .find_remote(ORIGIN)
            .ok()
            .map(|remote| remote.url().map(str::to_string));
        let Some(current) = existing else {
            self.attach_remote(&url);
            return Ok(());
        };

        if current.as_deref() != Some(url.as_str()) {
            self.repo.remote_set_url(ORIGIN, &url)?;
            tracing::info!(from = ?current, to = %url, "Updated remote URL");
        }
        Ok(())
    }

    /// Attach `url` as `origin`. An existing `origin` is left alone.
    pub fn attach_remote(&mut self, url: &str) {
        let added = attempt("add remote origin", || self.repo.remote(ORIGIN, url).map(|_| ()));
        if added.is_done() {
            tracing::info!(url, "Added remote");
        }
        self.remote_url = Some(url.to_string());
    }

    /// Repository-local settings: platform credential helper and rebase
    /// pulls. Failures leave the user's global git configuration in charge.
    fn configure_local(&self) {
        attempt("configure repository", || -> std::result::Result<(), git2::Error> {
            let mut config = self.repo.config()?;
            if let Some(helper) = credentials::platform_credential_helper(std::env::consts::OS) {
                config.set_str("credential.helper", helper)?;
            }
            config.set_bool("pull.rebase", true)
        });
    }

    /// Local path of the repository's working tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL of `origin` as configured, falling back to the URL given to `open`.
    pub fn remote_url(&self) -> Option<String> {
        self.repo
            .find_remote(ORIGIN)
            .ok()
            .and_then(|r| r.url().map(str::to_string))
            .or_else(|| self.remote_url.clone())
    }

    pub fn has_remote(&self) -> bool {
        self.repo.find_remote(ORIGIN).is_ok()
    }

    /// Directory holding one subtree per sync mapping.
    pub fn profiles_dir(&self) -> PathBuf {
        self.path.join(SyncPath::ProfilesDir)
    }

    /// Access to the underlying git2 repository.
    pub fn git(&self) -> &Repository {
        &self.repo
    }

    /// Signature for commits made by the engine.
    ///
    /// Uses the configured git identity, or `OrcaSync <orcasync@host>` when
    /// none is set.
    pub(crate) fn signature(&self) -> std::result::Result<Signature<'static>, git2::Error> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => {
                let email = format!("orcasync@{}", machine_hostname());
                Signature::now("OrcaSync", &email)
            }
        }
    }

    /// Current status of branch, working tree and managed subtree.
    pub fn status(&self) -> Result<RepoStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;

        let mut dirty = false;
        let mut untracked = 0;
        for entry in statuses.iter() {
            if entry.status() == Status::WT_NEW {
                untracked += 1;
            } else {
                dirty = true;
            }
        }

        Ok(RepoStatus {
            branch: self.current_branch()?,
            dirty,
            untracked,
            has_remote: self.has_remote(),
            synced_files: orca_fs::list_files(&self.profiles_dir())?.len(),
        })
    }
}

fn is_not_a_repository(e: &git2::Error) -> bool {
    e.code() == ErrorCode::NotFound
}

fn remove_invalid(path: &Path) -> Result<()> {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| orca_fs::Error::io(path, e))?;
    Ok(())
}
