//! Shared test utilities for the OrcaSync workspace.
//!
//! Fixtures for the two sides of a sync: a bare "shared store" remote and
//! the profile directories of a simulated machine.

pub mod git;
pub mod profiles;

pub use git::{bare_remote, commit_files_to_remote, remote_branch_tip, remote_file};
pub use profiles::{Machine, write_profile};
