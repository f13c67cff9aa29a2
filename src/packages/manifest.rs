// src/packages/manifest.rs

//! Manifest of an unpacked package archive
//!
//! The manifest lists every directory and file of the payload, relative to
//! the unpack root and always with forward slashes. Entries starting with
//! the reserved `.atxpkg_` prefix are control files and never part of the
//! payload. `.atxpkg_backup`, if present, lists the files to preserve when
//! they diverge on disk (configuration and the like).

use crate::error::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Prefix reserved for control files inside an archive
pub const MARKER_PREFIX: &str = ".atxpkg_";

/// Control file listing the files to preserve on conflict
pub const PRESERVE_MARKER: &str = ".atxpkg_backup";

/// Directories and files contained in one unpacked archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveManifest {
    /// Unpack root the relative paths are anchored at
    pub root: PathBuf,
    pub directories: BTreeSet<String>,
    pub files: BTreeSet<String>,
    /// Files declared preserve-on-conflict; always a subset of `files`
    pub preserve: BTreeSet<String>,
}

impl ArchiveManifest {
    /// Walk an unpacked archive and classify its entries
    pub fn read(unpacked_dir: &Path) -> Result<Self> {
        let mut directories = BTreeSet::new();
        let mut files = BTreeSet::new();

        for entry in WalkDir::new(unpacked_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(unpacked_dir) else {
                continue;
            };
            let relative = to_unix_path(relative);
            if relative.starts_with(MARKER_PREFIX) {
                trace!("skip control entry {}", relative);
                continue;
            }

            if entry.file_type().is_dir() {
                trace!("manifest D {}", relative);
                directories.insert(relative);
            } else {
                trace!("manifest F {}", relative);
                files.insert(relative);
            }
        }

        let preserve = read_preserve_list(&unpacked_dir.join(PRESERVE_MARKER), &files)?;

        debug!(
            "Manifest of {}: {} directories, {} files, {} preserved",
            unpacked_dir.display(),
            directories.len(),
            files.len(),
            preserve.len()
        );

        Ok(Self {
            root: unpacked_dir.to_path_buf(),
            directories,
            files,
            preserve,
        })
    }

    /// Location of a payload file inside the unpack root
    pub fn source_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn is_preserved(&self, relative: &str) -> bool {
        self.preserve.contains(relative)
    }
}

fn read_preserve_list(path: &Path, files: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    if !path.is_file() {
        return Ok(BTreeSet::new());
    }

    let mut preserve = BTreeSet::new();
    for line in fs::read_to_string(path)?.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let entry = line.replace('\\', "/");
        if files.contains(&entry) {
            preserve.insert(entry);
        } else {
            warn!("{} lists {} which is not in the archive", PRESERVE_MARKER, entry);
        }
    }

    Ok(preserve)
}

/// Render a relative path with forward slashes
pub fn to_unix_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
