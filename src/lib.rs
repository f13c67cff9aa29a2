// src/lib.rs

//! atxpkg package manager
//!
//! Installs versioned archive bundles into a filesystem prefix and keeps a
//! ledger of every file it put there, so later updates and removals know
//! exactly what to touch.
//!
//! # Architecture
//!
//! - Ledger-first: `installed.json` is the single record of what is installed
//! - Content fingerprints: every installed file is tracked by its MD5 digest
//! - Preserved files: configuration an archive declares is never silently
//!   overwritten; diverging copies get `.save`, `.new` or `.backup` siblings
//! - Repositories: HTTP index pages or local directories of archives

pub mod commands;
pub mod config;
pub mod db;
mod error;
pub mod filesystem;
pub mod hash;
pub mod operator;
pub mod packages;
pub mod reconcile;
pub mod repository;
pub mod resolver;
pub mod version;

pub use error::{Error, Result};
