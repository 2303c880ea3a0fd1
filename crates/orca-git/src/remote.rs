//! Pushing to and pulling from the shared store.
//!
//! Pull follows a fixed state machine:
//!
//! ```text
//! Start -> RebaseAttempt -> Success
//!                        -> divergent -> MergeAttempt -> Success
//!                                                     -> DivergentHistory
//!                        -> other failure -> classified error
//! ```

use std::cell::RefCell;

use git2::{
    AnnotatedCommit, BranchType, Commit, ErrorCode, Oid, PushOptions, Remote, ResetType,
    build::CheckoutBuilder,
};

use crate::best_effort::attempt;
use crate::classify;
use crate::credentials;
use crate::repository::{ORIGIN, SyncRepository};
use crate::{Error, Result};

/// How a branch is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    /// First push of a branch without upstream: explicit `src:dst` refspec,
    /// then `origin/<branch>` is recorded as upstream
    SetUpstream,
    /// Regular push of a branch that already tracks `origin/<branch>`
    Plain,
}

/// The push the engine will perform for a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPlan {
    pub kind: PushKind,
    pub refspec: String,
}

/// Result of a pull.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullOutcome {
    /// HEAD moved
    pub had_changes: bool,
    /// Paths changed between the old and new HEAD, relative to the
    /// repository root
    pub changed_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PullStrategy {
    Rebase,
    Merge,
}

impl SyncRepository {
    /// Work out how `branch` would be pushed.
    pub fn push_plan(&self, branch: &str) -> PushPlan {
        if self.has_upstream(branch) {
            PushPlan {
                kind: PushKind::Plain,
                refspec: format!("refs/heads/{branch}"),
            }
        } else {
            PushPlan {
                kind: PushKind::SetUpstream,
                refspec: format!("refs/heads/{branch}:refs/heads/{branch}"),
            }
        }
    }

    /// Push `branch` to `origin`.
    ///
    /// Every reference status the remote reports back is checked; a
    /// rejection is classified like any other push failure. Credentials are
    /// resolved without prompting, so missing credentials surface as an
    /// authentication error rather than a hang.
    pub fn push(&mut self, branch: &str) -> Result<PushKind> {
        let url = self.remote_url().unwrap_or_default();
        let mut remote = self.origin()?;
        let plan = self.push_plan(branch);

        let rejected: RefCell<Vec<String>> = RefCell::new(Vec::new());
        {
            let mut callbacks = credentials::callbacks(self.repo.config().ok());
            callbacks.push_update_reference(|refname, status| {
                if let Some(msg) = status {
                    rejected.borrow_mut().push(format!("{refname}: {msg}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            remote
                .push(&[plan.refspec.as_str()], Some(&mut options))
                .map_err(|e| Error::remote("push", &url, e.message()))?;
        }

        if let Some(summary) = rejected.into_inner().into_iter().next() {
            return Err(Error::remote("push", &url, &format!("rejected {summary}")));
        }

        if plan.kind == PushKind::SetUpstream {
            self.track_remote_branch(branch)?;
        }

        tracing::info!(branch, refspec = %plan.refspec, kind = ?plan.kind, "Pushed branch");
        Ok(plan.kind)
    }

    /// Pull `branch` from `origin` into the checked-out branch.
    ///
    /// Tries a rebase-style pull first. If that reports divergent history,
    /// a single merge-style pull is attempted; its failure is
    /// [`Error::DivergentHistory`]. Returns the paths that changed between
    /// the old and the new HEAD.
    pub fn pull(&mut self, branch: &str) -> Result<PullOutcome> {
        let url = self.remote_url().unwrap_or_default();
        self.origin()?;
        let old_head = self.head_commit_id()?;

        match self.pull_with(branch, PullStrategy::Rebase) {
            Ok(()) => {}
            Err(e) if classify::is_divergent(e.message()) => {
                tracing::warn!(branch, error = %e.message(), "Rebase pull diverged; retrying with merge");
                self.pull_with(branch, PullStrategy::Merge)
                    .map_err(|e| Error::DivergentHistory {
                        message: e.message().to_string(),
                    })?;
            }
            Err(e) => return Err(Error::remote("pull", &url, e.message())),
        }

        let new_head = self.head_commit_id()?;
        if new_head == old_head {
            tracing::debug!(branch, "Already up to date");
            return Ok(PullOutcome::default());
        }

        let changed_paths = self.changed_paths(old_head, new_head)?;
        tracing::info!(branch, changed = changed_paths.len(), "Pulled changes");
        Ok(PullOutcome {
            had_changes: true,
            changed_paths,
        })
    }

    fn origin(&self) -> Result<Remote<'_>> {
        self.repo.find_remote(ORIGIN).map_err(|_| Error::NoRemote {
            name: ORIGIN.to_string(),
        })
    }

    fn head_commit_id(&self) -> Result<Oid> {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.id())
            .map_err(|e| Error::NotInitialized {
                message: e.message().to_string(),
            })
    }

    /// Record `origin/<branch>` as upstream after a first push.
    fn track_remote_branch(&self, branch: &str) -> Result<()> {
        let tracking_ref = format!("refs/remotes/{ORIGIN}/{branch}");
        if self.repo.find_reference(&tracking_ref).is_err() {
            let local = self.repo.refname_to_id(&format!("refs/heads/{branch}"))?;
            self.repo
                .reference(&tracking_ref, local, true, "push: record remote branch")?;
        }

        let mut local = self.repo.find_branch(branch, BranchType::Local)?;
        local.set_upstream(Some(&format!("{ORIGIN}/{branch}")))?;
        Ok(())
    }

    fn pull_with(&self, branch: &str, strategy: PullStrategy) -> std::result::Result<(), git2::Error> {
        let fetched = self.fetch_tip(branch)?;
        let annotated = self.repo.find_annotated_commit(fetched.id())?;
        let (analysis, _) = self.repo.merge_analysis(&[&annotated])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if analysis.is_fast_forward() || analysis.is_unborn() {
            return self.fast_forward(branch, &fetched);
        }

        match strategy {
            PullStrategy::Rebase => self.rebase_onto(branch, &annotated),
            PullStrategy::Merge => self.merge_from(branch, &annotated, &fetched),
        }
    }

    /// Fetch `branch` into `origin/<branch>` and return its tip.
    fn fetch_tip(&self, branch: &str) -> std::result::Result<Commit<'_>, git2::Error> {
        let mut remote = self.repo.find_remote(ORIGIN)?;
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{ORIGIN}/{branch}");
        let mut options = credentials::fetch_options(self.repo.config().ok());
        remote.fetch(&[refspec.as_str()], Some(&mut options), None)?;

        let tracking_ref = format!("refs/remotes/{ORIGIN}/{branch}");
        match self.repo.find_reference(&tracking_ref) {
            Ok(reference) => reference.peel_to_commit(),
            Err(_) => Err(git2::Error::from_str(&format!(
                "couldn't find remote ref refs/heads/{branch}"
            ))),
        }
    }

    fn fast_forward(&self, branch: &str, target: &Commit<'_>) -> std::result::Result<(), git2::Error> {
        self.repo
            .checkout_tree(target.as_object(), Some(CheckoutBuilder::new().safe()))?;

        let refname = format!("refs/heads/{branch}");
        let log_message = format!("pull: fast-forward to {}", target.id());
        match self.repo.find_reference(&refname) {
            Ok(mut reference) => {
                reference.set_target(target.id(), &log_message)?;
            }
            Err(_) => {
                self.repo.reference(&refname, target.id(), true, &log_message)?;
            }
        }
        self.repo.set_head(&refname)
    }

    fn rebase_onto(
        &self,
        branch: &str,
        upstream: &AnnotatedCommit<'_>,
    ) -> std::result::Result<(), git2::Error> {
        let sig = self.signature()?;
        let mut rebase = self.repo.rebase(None, Some(upstream), None, None)?;

        let stopped = || {
            git2::Error::from_str(&format!(
                "divergent branches: rebasing '{branch}' onto {ORIGIN}/{branch} stopped on conflicts"
            ))
        };

        while let Some(operation) = rebase.next() {
            if let Err(e) = operation {
                attempt("abort rebase", || rebase.abort());
                return match e.code() {
                    ErrorCode::Conflict | ErrorCode::MergeConflict => Err(stopped()),
                    _ => Err(e),
                };
            }

            if self.repo.index()?.has_conflicts() {
                attempt("abort rebase", || rebase.abort());
                return Err(stopped());
            }

            match rebase.commit(None, &sig, None) {
                Ok(_) => {}
                // The remote already contains this change.
                Err(e) if e.code() == ErrorCode::Applied => {}
                Err(e) => {
                    attempt("abort rebase", || rebase.abort());
                    return Err(e);
                }
            }
        }

        rebase.finish(Some(&sig))
    }

    fn merge_from(
        &self,
        branch: &str,
        annotated: &AnnotatedCommit<'_>,
        fetched: &Commit<'_>,
    ) -> std::result::Result<(), git2::Error> {
        self.repo.merge(&[annotated], None, None)?;

        let mut index = self.repo.index()?;
        let head = self.repo.head()?.peel_to_commit()?;

        if index.has_conflicts() {
            self.repo.cleanup_state()?;
            self.repo.reset(head.as_object(), ResetType::Hard, None)?;
            return Err(git2::Error::from_str(&format!(
                "merging {ORIGIN}/{branch} stopped on conflicts"
            )));
        }

        let sig = self.signature()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let message = format!("Merge branch '{branch}' of {ORIGIN}");
        self.repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &[&head, fetched])?;
        self.repo.cleanup_state()?;

        tracing::info!(branch, "Merged divergent remote branch");
        Ok(())
    }

    fn changed_paths(&self, old: Oid, new: Oid) -> Result<Vec<String>> {
        let old_tree = self.repo.find_commit(old)?.tree()?;
        let new_tree = self.repo.find_commit(new)?.tree()?;
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        Ok(diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect())
    }
}
