//! Copying profile trees into and out of the managed subtree.
//!
//! Each external directory maps to `profiles/<leaf name>`. Both directions
//! replace the destination wholesale, so deletions propagate and nothing
//! stale survives a sync.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use orca_fs::{mapping_name, replace_tree};

use crate::repository::SyncRepository;
use crate::{Error, Result};

impl SyncRepository {
    /// Copy each existing source directory into `profiles/<leaf>`.
    ///
    /// Sources that are missing, or are not directories, are skipped and
    /// their subtree is left untouched. Two sources with the same leaf name
    /// are rejected before anything is copied.
    ///
    /// Returns the copied files relative to the repository root.
    pub fn push_tree(&self, sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let existing: Vec<&PathBuf> = sources
            .iter()
            .filter(|src| {
                let usable = src.is_dir();
                if !usable {
                    tracing::debug!(path = %src.display(), "Sync source is not a directory; skipping");
                }
                usable
            })
            .collect();
        let mappings = unique_mappings(&existing)?;

        let profiles = self.profiles_dir();
        std::fs::create_dir_all(&profiles).map_err(|e| orca_fs::Error::io(&profiles, e))?;

        let mut copied = Vec::new();
        for (src, name) in mappings {
            let dest = profiles.join(&name);
            for file in replace_tree(src, &dest)? {
                let relative = file.strip_prefix(&self.path).unwrap_or(file.as_path());
                copied.push(relative.to_path_buf());
            }
            tracing::info!(src = %src.display(), subtree = %name, "Pushed tree into repository");
        }

        Ok(copied)
    }

    /// Restore `profiles/<leaf>` over each destination directory.
    ///
    /// Destinations without a matching subtree are skipped. Parent
    /// directories are created as needed. Two destinations with the same
    /// leaf name are rejected before any of them is touched.
    ///
    /// Returns the restored files as absolute destination paths.
    pub fn pull_tree(&self, destinations: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let all: Vec<&PathBuf> = destinations.iter().collect();
        let mappings = unique_mappings(&all)?;

        let profiles = self.profiles_dir();
        if !profiles.is_dir() {
            return Ok(Vec::new());
        }

        let mut restored = Vec::new();
        for (dest, name) in mappings {
            let src = profiles.join(&name);
            if !src.is_dir() {
                tracing::debug!(subtree = %name, "No subtree in repository; skipping");
                continue;
            }

            restored.extend(replace_tree(&src, dest)?);
            tracing::info!(subtree = %name, dest = %dest.display(), "Restored tree from repository");
        }

        Ok(restored)
    }
}

/// Pair each path with its subtree name, rejecting duplicate names.
fn unique_mappings<'a>(paths: &[&'a PathBuf]) -> Result<Vec<(&'a Path, String)>> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    let mut mappings = Vec::with_capacity(paths.len());

    for path in paths {
        let name = mapping_name(path)?;
        if let Some(first) = seen.get(&name) {
            return Err(Error::MappingCollision {
                name,
                first: first.to_path_buf(),
                second: path.to_path_buf(),
            });
        }
        seen.insert(name.clone(), path.as_path());
        mappings.push((path.as_path(), name));
    }

    Ok(mappings)
}
