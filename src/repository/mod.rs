// src/repository/mod.rs

//! Repository access and package downloading
//!
//! This module provides functionality for:
//! - Listing the archives a repository offers (HTTP index pages or local
//!   directory trees)
//! - Collecting listings from every configured repository
//! - Downloading archives into the cache, resuming partial downloads
//! - Cleaning the download cache

mod download;
mod listing;

pub use download::clean_cache;
pub use listing::{is_url, parse_index};

use crate::error::{Error, Result};
use crate::resolver::AvailablePackages;
use crate::version::package_filename;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout for listing requests and for establishing connections (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for a failed request
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// HTTP client wrapper with retry support
pub struct RepositoryClient {
    client: Client,
    max_retries: u32,
}

impl RepositoryClient {
    /// Create a new repository client
    ///
    /// `unverified_ssl` disables certificate verification for every request.
    pub fn new(unverified_ssl: bool) -> Result<Self> {
        if unverified_ssl {
            warn!("SSL certificate verification is disabled");
        }

        let client = Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .timeout(None::<Duration>)
            .danger_accept_invalid_certs(unverified_ssl)
            .build()
            .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Send a request, retrying connection failures
    fn send(&self, url: &str, build: impl Fn(&Client) -> RequestBuilder) -> Result<Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match build(&self.client).send() {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(Error::DownloadError(format!("HTTP {} from {}", status, url)));
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Failed to fetch {} after {} attempts: {}",
                            url, attempt, e
                        )));
                    }
                    warn!("Request attempt {} for {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    /// List the archive locations a repository offers
    ///
    /// HTTP repositories are index pages whose links are scraped; anything
    /// else is a local directory that is walked recursively.
    pub fn listing(&self, repo: &str) -> Result<Vec<String>> {
        info!("Getting repository listing from {}", repo);
        if is_url(repo) {
            let response = self.send(repo, |client| client.get(repo).timeout(HTTP_TIMEOUT))?;
            let body = response.text()?;
            Ok(parse_index(repo, &body))
        } else {
            listing::directory_listing(Path::new(repo))
        }
    }

    /// Collect the packages offered by all repositories
    ///
    /// Unreachable repositories are skipped with a warning. With `offline`,
    /// HTTP repositories are not contacted at all.
    pub fn available_packages(&self, repos: &[String], offline: bool) -> AvailablePackages {
        let mut available = AvailablePackages::new();

        for repo in repos {
            if offline && is_url(repo) {
                debug!("Offline, skipping {}", repo);
                continue;
            }
            match self.listing(repo) {
                Ok(urls) => available.extend(AvailablePackages::from_urls(urls)),
                Err(e) => warn!("Skipping repository {}: {}", repo, e),
            }
        }

        debug!("{} packages available", available.len());
        available
    }

    /// Make an archive available locally, downloading it into `cache_dir`
    ///
    /// Local paths are returned as they are. A completed download already in
    /// the cache is reused.
    pub fn download_package_if_needed(&self, url: &str, cache_dir: &Path) -> Result<PathBuf> {
        if !is_url(url) {
            return Ok(PathBuf::from(url));
        }

        let dest = cache_dir.join(package_filename(url));
        if dest.exists() {
            info!("Using cached {}", dest.display());
            return Ok(dest);
        }

        self.download(url, &dest)?;
        Ok(dest)
    }
}

fn progress_bar(name: &str) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template(
        "{spinner} {prefix} [{wide_bar}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .map_err(|e| Error::DownloadError(format!("Invalid progress template: {}", e)))?
    .tick_chars(r"|/-\ ")
    .progress_chars("##-");

    Ok(ProgressBar::new(0)
        .with_prefix(name.to_string())
        .with_style(style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_local_path_is_used_in_place() {
        let client = RepositoryClient::new(false).unwrap();
        let cache = tempdir().unwrap();
        let path = client
            .download_package_if_needed("/srv/repo/tool-1.0-1.atxpkg.zip", cache.path())
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/repo/tool-1.0-1.atxpkg.zip"));
    }

    #[test]
    fn test_cached_download_is_reused() {
        let client = RepositoryClient::new(false).unwrap();
        let cache = tempdir().unwrap();
        let cached = cache.path().join("tool-1.0-1.atxpkg.zip");
        fs::write(&cached, "zip").unwrap();

        // The host does not resolve; a cache hit must not touch the network
        let path = client
            .download_package_if_needed("http://repo.invalid/tool-1.0-1.atxpkg.zip", cache.path())
            .unwrap();
        assert_eq!(path, cached);
    }

    #[test]
    fn test_available_packages_from_local_repositories() {
        let repo_a = tempdir().unwrap();
        let repo_b = tempdir().unwrap();
        fs::write(repo_a.path().join("tool-1.0-1.atxpkg.zip"), "").unwrap();
        fs::create_dir(repo_b.path().join("nested")).unwrap();
        fs::write(repo_b.path().join("nested/tool-1.1-1.atxpkg.zip"), "").unwrap();
        fs::write(repo_b.path().join("README"), "").unwrap();

        let repos = vec![
            repo_a.path().display().to_string(),
            repo_b.path().display().to_string(),
            repo_a.path().join("missing").display().to_string(),
            "http://repo.invalid/".to_string(),
        ];
        let client = RepositoryClient::new(false).unwrap();
        let available = client.available_packages(&repos, true);

        assert_eq!(available.get("tool").unwrap().len(), 2);
        assert_eq!(available.len(), 1);
    }
}
