//! Per-machine branch discipline.

use git2::{BranchType, Oid, build::CheckoutBuilder};

use crate::best_effort::attempt;
use crate::credentials;
use crate::repository::{ORIGIN, SyncRepository};
use crate::{Error, Result};

impl SyncRepository {
    /// Make `name` exist locally and check it out.
    ///
    /// A missing branch is created from `origin/<name>` (with upstream set)
    /// when the remote has it, otherwise from the current HEAD. The fetch
    /// and lookups done for discovery are best-effort: any failure falls
    /// back to branching from HEAD.
    pub fn ensure_branch(&mut self, name: &str) -> Result<()> {
        if self.repo.find_branch(name, BranchType::Local).is_err() {
            match self.discover_remote_branch(name) {
                Some(oid) => self.create_tracking_branch(name, oid)?,
                None => self.create_branch_from_head(name)?,
            }
        }

        self.checkout_branch(name)
    }

    /// Name of the checked-out branch, or `None` if HEAD is detached or
    /// unborn.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    /// Whether the local branch `name` has an upstream configured.
    pub fn has_upstream(&self, name: &str) -> bool {
        self.repo
            .find_branch(name, BranchType::Local)
            .and_then(|b| b.upstream().map(|_| ()))
            .is_ok()
    }

    fn discover_remote_branch(&self, name: &str) -> Option<Oid> {
        let mut remote = self.repo.find_remote(ORIGIN).ok()?;

        let config = self.repo.config().ok();
        attempt("fetch origin for branch discovery", || {
            let mut options = credentials::fetch_options(config);
            remote.fetch(&[] as &[&str], Some(&mut options), None)
        });

        let remote_name = format!("{ORIGIN}/{name}");
        let oid = self
            .repo
            .find_branch(&remote_name, BranchType::Remote)
            .ok()?
            .get()
            .target();
        tracing::debug!(branch = %name, found = oid.is_some(), "Looked up remote branch");
        oid
    }

    fn create_tracking_branch(&self, name: &str, oid: Oid) -> Result<()> {
        let commit = self.repo.find_commit(oid)?;
        let mut branch = self.repo.branch(name, &commit, false)?;
        let upstream = format!("{ORIGIN}/{name}");
        attempt("set upstream", || branch.set_upstream(Some(&upstream)));

        tracing::info!(branch = %name, %upstream, "Created local branch tracking remote");
        Ok(())
    }

    fn create_branch_from_head(&self, name: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| Error::NotInitialized {
                message: format!("no commit to create branch '{name}' from: {}", e.message()),
            })?;
        self.repo.branch(name, &head, false)?;

        tracing::info!(branch = %name, base = %head.id(), "Created local branch from HEAD");
        Ok(())
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        if self.current_branch()?.as_deref() == Some(name) {
            return Ok(());
        }

        let refname = format!("refs/heads/{name}");
        let target = self.repo.revparse_single(&refname)?;
        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
        self.repo.set_head(&refname)?;

        tracing::debug!(branch = %name, "Checked out branch");
        Ok(())
    }
}
