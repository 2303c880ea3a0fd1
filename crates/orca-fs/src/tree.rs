//! Full-replace directory tree copies

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result, SyncPath};

/// Replace `dest` with a recursive copy of `src`.
///
/// Anything previously at `dest` is removed first, so files deleted from
/// `src` never survive in `dest`. Parent directories of `dest` are created
/// as needed. Nested `.git` entries are not copied.
///
/// Returns every regular file written, as paths under `dest`, sorted.
pub fn replace_tree(src: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    remove_path(dest)?;

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut copied = Vec::new();
    copy_dir(src, dest, &mut copied)?;
    copied.sort();

    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        files = copied.len(),
        "Replaced tree"
    );
    Ok(copied)
}

/// List every regular file below `root`, sorted.
///
/// Returns an empty list when `root` does not exist.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if root.is_dir() {
        collect_files(root, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io(path, e)),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}

fn copy_dir(src: &Path, dest: &Path, copied: &mut Vec<PathBuf>) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    for entry in fs::read_dir(src).map_err(|e| Error::io(src, e))? {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        if entry.file_name() == SyncPath::GitDir.as_str() {
            continue;
        }

        let from = entry.path();
        let to = dest.join(entry.file_name());
        // Follows symlinks: linked content is copied, not the link.
        let metadata = fs::metadata(&from).map_err(|e| Error::io(&from, e))?;

        if metadata.is_dir() {
            copy_dir(&from, &to, copied)?;
        } else if metadata.is_file() {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            copied.push(to);
        }
    }

    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
