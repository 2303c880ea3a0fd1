//! Steps whose failure must not stop a sync session.
//!
//! Adding a remote that already exists, writing credential configuration,
//! or fetching during branch discovery may fail without affecting the
//! outcome. Routing them through [`attempt`] keeps that contract visible at
//! the call site: the session proceeds regardless of the result.

use std::fmt::Display;

/// Outcome of a best-effort step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The step succeeded
    Done(T),
    /// The step failed; carries the failure text for diagnostics
    Skipped(String),
}

impl<T> Attempt<T> {
    /// Convert into an `Option`, discarding the failure text.
    pub fn ok(self) -> Option<T> {
        match self {
            Attempt::Done(value) => Some(value),
            Attempt::Skipped(_) => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Attempt::Done(_))
    }
}

/// Run a best-effort step, logging a failure at debug level.
pub fn attempt<T, E: Display>(step: &str, f: impl FnOnce() -> Result<T, E>) -> Attempt<T> {
    match f() {
        Ok(value) => Attempt::Done(value),
        Err(e) => {
            tracing::debug!(step, error = %e, "Best-effort step failed; continuing");
            Attempt::Skipped(e.to_string())
        }
    }
}
