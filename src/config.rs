// src/config.rs

//! Root directory layout
//!
//! Everything atxpkg keeps for itself lives under one root directory:
//!
//! ```text
//! <root>/installed.json   installed-package ledger
//! <root>/repos.txt        repositories, one per line, '#' comments
//! <root>/cache/           downloaded archives (also the first repository)
//! <root>/tmp/             unpack scratch space
//! ```
//!
//! Packages themselves are installed under a separate prefix.

use crate::error::{Error, Result};
use crate::operator::DEFAULT_MERGE_TOOL;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default root directory
#[cfg(windows)]
pub const DEFAULT_ROOT: &str = "c:/atxpkg";
#[cfg(not(windows))]
pub const DEFAULT_ROOT: &str = "/tmp/atxpkg";

/// Default install prefix
#[cfg(windows)]
pub const DEFAULT_PREFIX: &str = "c:/";
#[cfg(not(windows))]
pub const DEFAULT_PREFIX: &str = "/";

/// Paths and settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    pub prefix: PathBuf,
    pub db_path: PathBuf,
    pub repos_path: PathBuf,
    pub cache_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub merge_tool: String,
}

impl Config {
    /// Lay out the root directory structure
    pub fn new(root_dir: impl Into<PathBuf>, prefix: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        Self {
            db_path: root_dir.join("installed.json"),
            repos_path: root_dir.join("repos.txt"),
            cache_dir: root_dir.join("cache"),
            tmp_dir: root_dir.join("tmp"),
            prefix: prefix.into(),
            merge_tool: DEFAULT_MERGE_TOOL.to_string(),
            root_dir,
        }
    }

    pub fn with_merge_tool(mut self, merge_tool: impl Into<String>) -> Self {
        self.merge_tool = merge_tool.into();
        self
    }

    /// Create the cache and scratch directories and check the prefix
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.cache_dir, &self.tmp_dir] {
            if !dir.is_dir() {
                debug!("Creating {}", dir.display());
                fs::create_dir_all(dir).map_err(|e| {
                    Error::IoError(format!("Failed to create {}: {}", dir.display(), e))
                })?;
            }
        }

        if !self.prefix.is_dir() {
            return Err(Error::NotFoundError(format!(
                "Prefix {} does not exist",
                self.prefix.display()
            )));
        }

        Ok(())
    }

    /// Repositories to search, the download cache first
    pub fn repositories(&self) -> Result<Vec<String>> {
        let mut repos = vec![self.cache_dir.display().to_string()];
        repos.extend(read_repos_file(&self.repos_path)?);
        debug!("Repositories: {:?}", repos);
        Ok(repos)
    }
}

fn read_repos_file(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
