//! Git repository fixtures.
//!
//! Everything goes through `git2` so tests do not depend on a `git` binary
//! or on the developer's global git identity.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{BranchType, Repository, Signature};

fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com")
        .unwrap_or_else(|e| panic!("signature: {e}"))
}

/// Creates an empty bare repository standing in for the shared store.
///
/// Returns the path to use as the remote URL.
///
/// # Panics
/// Panics if the repository cannot be created.
pub fn bare_remote(path: &Path) -> PathBuf {
    Repository::init_bare(path).unwrap_or_else(|e| {
        panic!("bare_remote: failed to init at {}: {e}", path.display())
    });
    path.to_path_buf()
}

/// Commits `files` onto `branch` of the bare repository at `remote`,
/// as another machine would.
///
/// The commit's parent is the branch's current tip, or none if the branch
/// does not exist yet. Files not listed are carried over from the parent.
/// If the store has no default branch yet, `branch` becomes it.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_files_to_remote(remote: &Path, branch: &str, files: &[(&str, &str)], message: &str) {
    let scratch = tempfile::TempDir::new().expect("commit_files_to_remote: temp dir");
    let work = scratch.path().join("work");
    let repo = Repository::clone(remote.to_str().expect("utf-8 remote path"), &work)
        .unwrap_or_else(|e| panic!("commit_files_to_remote: clone failed: {e}"));

    let parent = repo
        .find_branch(&format!("origin/{branch}"), BranchType::Remote)
        .ok()
        .and_then(|b| b.get().peel_to_commit().ok());

    let mut index = repo.index().unwrap();
    if let Some(ref parent) = parent {
        index.read_tree(&parent.tree().unwrap()).unwrap();
    } else {
        index.clear().unwrap();
    }

    for (rel, content) in files {
        let full = work.join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, content).unwrap();
        index.add_path(Path::new(rel)).unwrap();
    }

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = signature();
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let refname = format!("refs/heads/{branch}");
    let oid = repo
        .commit(None, &sig, &sig, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_files_to_remote: commit failed: {e}"));
    repo.reference(&refname, oid, true, "fixture").unwrap();

    let mut origin = repo.find_remote("origin").unwrap();
    origin
        .push(&[format!("+{refname}:{refname}").as_str()], None)
        .unwrap_or_else(|e| panic!("commit_files_to_remote: push failed: {e}"));

    // The first branch pushed becomes the store's default branch.
    let bare = Repository::open_bare(remote).unwrap();
    if bare.head().is_err() {
        bare.set_head(&refname).unwrap();
    }
}

/// Tip of `branch` in the bare repository, if the branch exists.
pub fn remote_branch_tip(remote: &Path, branch: &str) -> Option<git2::Oid> {
    let repo = Repository::open_bare(remote).ok()?;
    repo.refname_to_id(&format!("refs/heads/{branch}")).ok()
}

/// Content of `path` at the tip of `branch` in the bare repository.
pub fn remote_file(remote: &Path, branch: &str, path: &str) -> Option<String> {
    let repo = Repository::open_bare(remote).ok()?;
    let commit = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .ok()?
        .peel_to_commit()
        .ok()?;
    let entry = commit.tree().ok()?.get_path(Path::new(path)).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    String::from_utf8(blob.content().to_vec()).ok()
}
