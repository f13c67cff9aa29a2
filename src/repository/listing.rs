// src/repository/listing.rs

//! Repository listings
//!
//! An HTTP repository is any page with links to archives, typically an
//! autoindex. A local repository is a directory tree holding archives.

use crate::error::Result;
use crate::version::has_package_extension;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::trace;
use walkdir::WalkDir;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href\s*=\s*["']?([^"'\s>]+)["']?"#).expect("href regex is valid")
});

/// Whether a repository or archive location is an HTTP(S) URL
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Extract archive URLs from an index page served at `base`
pub fn parse_index(base: &str, body: &str) -> Vec<String> {
    let base = base.trim_end_matches('/');
    HREF_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|href| has_package_extension(href))
        .map(|href| {
            if is_url(href) {
                href.to_string()
            } else {
                format!("{}/{}", base, href.trim_start_matches("./"))
            }
        })
        .collect()
}

/// Archive paths below a local repository directory
pub(super) fn directory_listing(root: &Path) -> Result<Vec<String>> {
    let mut archives = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !has_package_extension(name) {
            trace!("skip {}", entry.path().display());
            continue;
        }
        archives.push(entry.path().display().to_string());
    }

    Ok(archives)
}
