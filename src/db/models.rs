// src/db/models.rs

//! Data models for the installed-package ledger
//!
//! On disk an entry keeps the historical layout:
//!
//! ```json
//! { "t": 1721681443.5, "version": "1.0-1",
//!   "md5sums": { "app": null, "app/main.cfg": "5d41402abc4b2a76b9719d911017c592" },
//!   "backup": ["app/main.cfg"] }
//! ```
//!
//! Directories are the `md5sums` keys with a `null` value; `backup` may be
//! absent or `null` when the package preserves nothing. In memory both are
//! explicit fields.

use crate::error::{Error, Result};
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One installed package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LedgerRecord", into = "LedgerRecord")]
pub struct InstalledPackage {
    pub version: Version,
    /// Content fingerprint of every installed file, keyed by prefix-relative path
    pub fingerprints: BTreeMap<String, String>,
    /// Directories created for the package
    pub directories: BTreeSet<String>,
    /// Files preserved on conflict
    pub preserve: BTreeSet<String>,
    /// Unix time of the install or last update, in seconds
    pub installed_at: Option<f64>,
}

impl InstalledPackage {
    /// Create a new entry stamped with the current time
    pub fn new(
        version: Version,
        fingerprints: BTreeMap<String, String>,
        directories: BTreeSet<String>,
        preserve: BTreeSet<String>,
    ) -> Self {
        Self {
            version,
            fingerprints,
            directories,
            preserve,
            installed_at: Some(current_timestamp()),
        }
    }

    pub fn is_preserved(&self, path: &str) -> bool {
        self.preserve.contains(path)
    }

    /// Whether a path (file or directory) belongs to this package
    pub fn tracks(&self, path: &str) -> bool {
        self.fingerprints.contains_key(path) || self.directories.contains(path)
    }

    /// All tracked paths, files and directories
    pub fn tracked_paths(&self) -> impl Iterator<Item = &String> {
        self.fingerprints.keys().chain(self.directories.iter())
    }

    /// Install time as a UTC date, if recorded
    pub fn installed_at_utc(&self) -> Option<DateTime<Utc>> {
        let t = self.installed_at?;
        let secs = t.trunc() as i64;
        let nanos = ((t - t.trunc()) * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Current time as fractional Unix seconds
pub fn current_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Serialized form of an `InstalledPackage`
#[derive(Debug, Serialize, Deserialize)]
struct LedgerRecord {
    #[serde(default)]
    t: Option<f64>,
    version: String,
    #[serde(default)]
    md5sums: BTreeMap<String, Option<String>>,
    #[serde(default)]
    backup: Option<Vec<String>>,
}

impl TryFrom<LedgerRecord> for InstalledPackage {
    type Error = Error;

    fn try_from(record: LedgerRecord) -> Result<Self> {
        let version = Version::parse(&record.version)?;

        let mut fingerprints = BTreeMap::new();
        let mut directories = BTreeSet::new();
        for (path, sum) in record.md5sums {
            match sum {
                Some(sum) => {
                    fingerprints.insert(path, sum);
                }
                None => {
                    directories.insert(path);
                }
            }
        }

        Ok(Self {
            version,
            fingerprints,
            directories,
            preserve: record.backup.unwrap_or_default().into_iter().collect(),
            installed_at: record.t,
        })
    }
}

impl From<InstalledPackage> for LedgerRecord {
    fn from(package: InstalledPackage) -> Self {
        let mut md5sums: BTreeMap<String, Option<String>> = package
            .directories
            .into_iter()
            .map(|dir| (dir, None))
            .collect();
        md5sums.extend(
            package
                .fingerprints
                .into_iter()
                .map(|(path, sum)| (path, Some(sum))),
        );

        let backup = if package.preserve.is_empty() {
            None
        } else {
            Some(package.preserve.into_iter().collect())
        };

        Self {
            t: package.installed_at,
            version: package.version.to_string(),
            md5sums,
            backup,
        }
    }
}
