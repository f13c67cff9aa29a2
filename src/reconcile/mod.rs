// src/reconcile/mod.rs

//! Reconciliation engine
//!
//! Computes and applies the filesystem mutations for installing, updating
//! and removing one package under a prefix, and produces the new ledger
//! entry. Every operation runs in a fixed order: conflict checks complete
//! before the first write, directories are created before files, and new or
//! changed files are written before removed files are cleaned up.
//!
//! Preserved files (declared by the archive) are never overwritten or
//! deleted while their on-disk content diverges from the recorded
//! fingerprint; the engine writes a side artifact instead:
//!
//! | Artifact   | Created by | Holds                                     |
//! |------------|------------|-------------------------------------------|
//! | `.save`    | install, update | the user's copy, moved out of the way |
//! | `.new`     | update     | the package's new content                 |
//! | `.backup`  | remove     | the user's edited copy                    |

mod install;
mod merge;
mod remove;
mod update;

pub use install::install;
pub use merge::merge_config;
pub use remove::remove;
pub use update::update;

use crate::db::InstalledPackage;
use crate::error::{Error, Result};
use crate::filesystem::{apply_attributes, target_path, with_suffix};
use crate::packages::ArchiveManifest;
use std::fmt;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Side artifacts written next to a diverging preserved file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArtifact {
    /// User's file moved aside by install or update
    Save,
    /// New package content installed beside the user's file
    New,
    /// User's edited file kept on removal
    Backup,
}

impl SideArtifact {
    /// Lookup order used by `merge_config`
    pub const ALL: [SideArtifact; 3] = [Self::Backup, Self::New, Self::Save];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Save => ".save",
            Self::New => ".new",
            Self::Backup => ".backup",
        }
    }

    /// Artifact location for a target file
    pub fn path_for(&self, target: &Path) -> PathBuf {
        with_suffix(target, self.suffix())
    }
}

/// One filesystem decision made by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Directory created under the prefix
    CreatedDir(String),
    /// File written with the package content
    Wrote(String),
    /// File left untouched
    Skipped(String),
    /// Package content written to a side artifact instead of the target
    SideInstalled { path: String, artifact: PathBuf },
    /// On-disk file moved to a side artifact
    MovedAside { path: String, artifact: PathBuf },
    /// File deleted
    Deleted(String),
    /// Empty directory removed
    RemovedDir(String),
    /// Tracked file was already gone
    Missing(String),
    /// Tracked file could not be read; left in place
    Unreadable(String),
    /// Tracked file could not be deleted or moved aside; left in place
    Failed(String),
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatedDir(p) => write!(f, "ID {}", p),
            Self::Wrote(p) => write!(f, "F {}", p),
            Self::Skipped(p) => write!(f, "S {}", p),
            Self::SideInstalled { path, artifact } => {
                write!(f, "N {} -> {}", path, artifact.display())
            }
            Self::MovedAside { path, artifact } => {
                write!(f, "B {} -> {}", path, artifact.display())
            }
            Self::Deleted(p) => write!(f, "DF {}", p),
            Self::RemovedDir(p) => write!(f, "DD {}", p),
            Self::Missing(p) => write!(f, "M {}", p),
            Self::Unreadable(p) => write!(f, "U {}", p),
            Self::Failed(p) => write!(f, "E {}", p),
        }
    }
}

/// Ordered log of what an operation did
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub actions: Vec<FileAction>,
}

impl Report {
    pub(crate) fn push(&mut self, action: FileAction) {
        tracing::trace!("{}", action);
        self.actions.push(action);
    }

    /// Paths whose content was written in place
    pub fn written(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                FileAction::Wrote(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Paths left untouched
    pub fn skipped(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                FileAction::Skipped(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Side artifacts created (`.save`, `.new`, `.backup`)
    pub fn artifacts(&self) -> Vec<&Path> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                FileAction::SideInstalled { artifact, .. }
                | FileAction::MovedAside { artifact, .. } => Some(artifact.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Paths deleted
    pub fn deleted(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                FileAction::Deleted(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Result of an install or update: the new ledger entry plus what was done
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub package: InstalledPackage,
    pub report: Report,
}

/// Create the manifest's directories that are missing under `prefix`
///
/// Returns each created directory with the archive's metadata for it, to
/// be applied once the files are in place.
pub(crate) fn create_directories(
    manifest: &ArchiveManifest,
    prefix: &Path,
    report: &mut Report,
) -> Result<Vec<(PathBuf, Metadata)>> {
    let mut created = Vec::new();
    for dir in &manifest.directories {
        let target = target_path(prefix, dir)?;
        if target.is_dir() {
            continue;
        }
        let source = fs::metadata(manifest.source_path(dir))?;
        fs::create_dir_all(&target).map_err(|e| {
            Error::IoError(format!("Failed to create {}: {}", target.display(), e))
        })?;
        report.push(FileAction::CreatedDir(dir.clone()));
        created.push((target, source));
    }
    Ok(created)
}

/// Give created directories the archive's permissions and times
///
/// Runs after files are moved in, since that touches directory times.
/// Failures are logged and ignored.
pub(crate) fn restore_directory_attributes(created: &[(PathBuf, Metadata)]) {
    for (target, source) in created.iter().rev() {
        if let Err(e) = apply_attributes(target, source) {
            warn!("{}", e);
        }
    }
}

/// Deepest directories first, so children go before their parents
pub(crate) fn deepest_first<'a, I>(dirs: I) -> Vec<&'a String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut dirs: Vec<&String> = dirs.into_iter().collect();
    dirs.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));
    dirs
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for building unpacked archives on disk

    use crate::packages::ArchiveManifest;
    use crate::packages::manifest::PRESERVE_MARKER;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Lay out an unpacked archive and read its manifest
    pub fn manifest(files: &[(&str, &str)], preserve: &[&str]) -> (TempDir, ArchiveManifest) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        if !preserve.is_empty() {
            fs::write(dir.path().join(PRESERVE_MARKER), preserve.join("\n")).unwrap();
        }
        let manifest = ArchiveManifest::read(dir.path()).unwrap();
        (dir, manifest)
    }

    pub fn read(prefix: &Path, path: &str) -> String {
        fs::read_to_string(prefix.join(path)).unwrap()
    }
}
