// src/repository/download.rs

//! Package downloads and the download cache
//!
//! A download goes to `<cache>/<filename>_` and is renamed to its final
//! name only once complete, so the cache never holds a truncated archive
//! under a valid package name. A leftover partial file is resumed with a
//! `Range` request when the server accepts byte ranges.

use super::{RepositoryClient, progress_bar};
use crate::error::{Error, Result};
use crate::filesystem::with_suffix;
use crate::version::package_filename;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT_RANGES, RANGE};
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Suffix of in-progress downloads in the cache
const PARTIAL_SUFFIX: &str = "_";

impl RepositoryClient {
    /// Download `url` to `dest`, resuming a previous partial download
    pub(super) fn download(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        let partial = with_suffix(dest, PARTIAL_SUFFIX);
        info!("Downloading {} to {}", url, partial.display());

        let mut resume_from = 0;
        if partial.exists() && self.accepts_ranges(url) {
            resume_from = fs::metadata(&partial).map(|m| m.len()).unwrap_or(0);
        }

        let response = self.send(url, |client| {
            let request = client.get(url);
            if resume_from > 0 {
                request.header(RANGE, format!("bytes={}-", resume_from))
            } else {
                request
            }
        })?;

        // A server may ignore the range and send the whole file
        let append = resume_from > 0 && response.status() == StatusCode::PARTIAL_CONTENT;
        if append {
            info!("Resuming from {}", resume_from);
        } else {
            resume_from = 0;
        }

        let pb = progress_bar(package_filename(url))?;
        pb.set_length(resume_from + response.content_length().unwrap_or(0));
        pb.set_position(resume_from);
        pb.reset_eta();
        pb.enable_steady_tick(Duration::from_millis(200));

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&partial)
            .map_err(|e| {
                Error::IoError(format!("Failed to create file {}: {}", partial.display(), e))
            })?;
        let mut writer = BufWriter::new(file);
        io::copy(&mut pb.wrap_read(response), &mut writer)
            .map_err(|e| Error::DownloadError(format!("Failed to download {}: {}", url, e)))?;
        writer.flush()?;
        pb.finish();

        trace!("renaming {} to {}", partial.display(), dest.display());
        fs::rename(&partial, dest).map_err(|e| {
            Error::IoError(format!(
                "Failed to move {} to {}: {}",
                partial.display(),
                dest.display(),
                e
            ))
        })?;

        info!("Downloaded {}", dest.display());
        Ok(())
    }

    fn accepts_ranges(&self, url: &str) -> bool {
        match self.send(url, |client| client.head(url)) {
            Ok(response) => response
                .headers()
                .get(ACCEPT_RANGES)
                .is_some_and(|v| v == "bytes"),
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Delete every file in the download cache; returns the paths deleted
pub fn clean_cache(cache_dir: &Path) -> Result<Vec<String>> {
    let mut deleted = Vec::new();
    if !cache_dir.is_dir() {
        return Ok(deleted);
    }

    for entry in fs::read_dir(cache_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|e| {
            Error::IoError(format!("Failed to delete {}: {}", path.display(), e))
        })?;
        deleted.push(path.display().to_string());
    }

    deleted.sort();
    Ok(deleted)
}
