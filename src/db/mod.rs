// src/db/mod.rs

//! Installed-package ledger
//!
//! The ledger is a single JSON document mapping package name to
//! `InstalledPackage`. It is read once at startup and written in full after
//! every mutating step: the new document goes to a sibling temp file which is
//! then renamed over the old one, so a crash never leaves a half-written
//! ledger behind.
//!
//! There is no locking. Two concurrent runs against the same root may lose
//! each other's updates.

pub mod models;

pub use models::InstalledPackage;

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The persisted record of everything installed under a prefix
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    packages: BTreeMap<String, InstalledPackage>,
}

impl Ledger {
    /// Load the ledger at `path`
    ///
    /// A missing or empty file yields an empty ledger; the file is created on
    /// the first `save`.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Loading installed packages from {}", path.display());

        let packages = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::IoError(format!("Failed to read ledger {}: {}", path.display(), e))
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            packages,
        })
    }

    /// Write the whole ledger back to disk
    pub fn save(&self) -> Result<()> {
        debug!(
            "Saving {} installed packages to {}",
            self.packages.len(),
            self.path.display()
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create ledger directory: {}", e))
            })?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        {
            let file = fs::File::create(&temp_path).map_err(|e| {
                Error::IoError(format!("Failed to create {}: {}", temp_path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.packages)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| Error::IoError(format!("Failed to sync ledger: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            Error::IoError(format!(
                "Failed to move {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Installed packages, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InstalledPackage)> {
        self.packages.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Record a freshly installed package
    pub fn insert(&mut self, name: &str, package: InstalledPackage) {
        self.packages.insert(name.to_string(), package);
    }

    /// Forget a package
    pub fn remove(&mut self, name: &str) -> Option<InstalledPackage> {
        self.packages.remove(name)
    }

    /// Replace an entry after an update, possibly under a new name
    pub fn replace(&mut self, old_name: &str, new_name: &str, package: InstalledPackage) {
        self.packages.remove(old_name);
        self.packages.insert(new_name.to_string(), package);
    }
}
