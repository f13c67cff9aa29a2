// src/filesystem/mod.rs

//! Filesystem primitives for reconciling a prefix
//!
//! - Prefix-confined path joining (no `..`, no absolute escapes)
//! - Rename-based delete, so a file held open elsewhere can still be replaced
//! - Move with copy fallback across filesystems
//! - Best-effort empty-directory cleanup that reports instead of failing

use crate::error::{Error, Result};
use filetime::FileTime;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{trace, warn};

/// Suffix for files renamed out of the way right before deletion
const DELETE_SUFFIX: &str = ".atxpkg_delete";

/// Join a prefix-relative path onto the prefix
///
/// Rejects paths that would escape the prefix.
pub fn target_path(prefix: &Path, relative: &str) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                warn!("Path traversal attempt detected: {}", relative);
                return Err(Error::IoError(format!(
                    "Path escapes install prefix: {}",
                    relative
                )));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::IoError(format!("Empty path: '{}'", relative)));
    }

    Ok(prefix.join(normalized))
}

/// `path` with `suffix` appended to its final component
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Whether anything (file, directory, dangling symlink) exists at `path`
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Delete a file by renaming it aside first, then removing it
///
/// Renaming frees the path immediately even when another process still holds
/// the file open. A missing file is not an error; a directory is.
pub fn try_delete(path: &Path) -> Result<()> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    if metadata.is_dir() {
        return Err(Error::IoError(format!("Not a file: {}", path.display())));
    }

    let mut doomed = with_suffix(path, DELETE_SUFFIX);
    while exists(&doomed) {
        if let Err(e) = fs::remove_file(&doomed) {
            warn!("Failed to remove {}: {}", doomed.display(), e);
            doomed = with_suffix(&doomed, "_delete");
        } else {
            break;
        }
    }

    trace!("renaming {} to {}", path.display(), doomed.display());
    fs::rename(path, &doomed).map_err(|e| {
        Error::IoError(format!("Failed to delete {}: {}", path.display(), e))
    })?;

    if let Err(e) = fs::remove_file(&doomed) {
        warn!("Failed to remove {}: {}", doomed.display(), e);
    }

    Ok(())
}

/// Move a file into place, replacing whatever file is at `to`
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    try_delete(to)?;

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e)
            if e.kind() == io::ErrorKind::CrossesDevices
                || e.kind() == io::ErrorKind::Unsupported =>
        {
            trace!("rename across filesystems, copying {} to {}", from.display(), to.display());
            let metadata = fs::metadata(from)?;
            fs::copy(from, to).map_err(|e| {
                Error::IoError(format!(
                    "Failed to copy {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                ))
            })?;
            let mtime = FileTime::from_last_modification_time(&metadata);
            filetime::set_file_mtime(to, mtime)?;
            try_delete(from)
        }
        Err(e) => Err(Error::IoError(format!(
            "Failed to move {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))),
    }
}

/// Give `target` the permissions and modification time recorded in `source`
pub fn apply_attributes(target: &Path, source: &Metadata) -> Result<()> {
    fs::set_permissions(target, source.permissions()).map_err(|e| {
        Error::IoError(format!("Failed to set permissions of {}: {}", target.display(), e))
    })?;
    let mtime = FileTime::from_last_modification_time(source);
    filetime::set_file_times(target, mtime, mtime).map_err(|e| {
        Error::IoError(format!("Failed to set times of {}: {}", target.display(), e))
    })
}

/// Whether `path` is a directory with no entries
pub fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Remove `path` if it is an empty directory; returns whether it was removed
pub fn remove_dir_if_empty(path: &Path) -> bool {
    if !is_empty_dir(path) {
        return false;
    }
    match fs::remove_dir(path) {
        Ok(()) => {
            trace!("removed directory {}", path.display());
            true
        }
        Err(e) => {
            trace!("keeping directory {}: {}", path.display(), e);
            false
        }
    }
}

/// Remove the now-empty parent directories of a deleted file, walking upward
///
/// Stops at the prefix, at the first directory listed in `keep`, and at the
/// first directory that is not empty. Returns the prefix-relative paths of
/// the directories removed.
pub fn prune_empty_parents(prefix: &Path, relative: &str, keep: &BTreeSet<String>) -> Vec<String> {
    let mut removed = Vec::new();
    let mut current = relative;

    while let Some((parent, _)) = current.rsplit_once('/') {
        if parent.is_empty() || keep.contains(parent) {
            break;
        }
        let Ok(dir) = target_path(prefix, parent) else {
            break;
        };
        if !remove_dir_if_empty(&dir) {
            break;
        }
        removed.push(parent.to_string());
        current = parent;
    }

    removed
}
