//! Repository and synchronization engine for OrcaSync
//!
//! One [`SyncRepository`] handle drives a whole sync session: open (clone,
//! init or reopen), ensure the per-machine branch, copy profile trees in or
//! out of the managed `profiles/` subtree, commit, and push or pull.
//!
//! The engine is single-actor: nothing here locks the repository, so callers
//! must not run two sessions against the same path at once.

pub mod best_effort;
pub mod branch;
pub mod classify;
pub mod commits;
pub mod credentials;
pub mod error;
pub mod remote;
pub mod repository;
pub mod tree;

pub use best_effort::{Attempt, attempt};
pub use classify::{ErrorKind, classify};
pub use commits::{CommitInfo, default_message, machine_hostname};
pub use error::{Error, Result};
pub use remote::{PullOutcome, PushKind, PushPlan};
pub use repository::{ORIGIN, RepoStatus, SyncRepository};
