// src/packages/archive.rs

//! Package archive unpacking
//!
//! Handles `.atxpkg.zip` plus tarballs compressed with gzip, zstd or xz.

use crate::error::{Error, Result};
use crate::packages::traits::PackageArchive;
use crate::version::{PackageRef, Version, package_filename};
use chrono::NaiveDate;
use filetime::FileTime;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use xz2::read::XzDecoder;

/// Archive container/compression format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
    TarZst,
    TarXz,
}

impl ArchiveFormat {
    /// Detect archive format from file extension
    pub fn detect(path: &Path) -> Result<Self> {
        let filename = package_filename(&path.to_string_lossy()).to_string();
        if filename.ends_with(".zip") {
            Ok(Self::Zip)
        } else if filename.ends_with(".tar.gz") {
            Ok(Self::TarGz)
        } else if filename.ends_with(".tar.zst") {
            Ok(Self::TarZst)
        } else if filename.ends_with(".tar.xz") {
            Ok(Self::TarXz)
        } else {
            Err(Error::ParseError(format!(
                "Unsupported archive format: {}. Expected .zip, .tar.gz, .tar.zst or .tar.xz",
                filename
            )))
        }
    }
}

/// A package archive on local disk
#[derive(Debug)]
pub struct ArchivePackage {
    path: PathBuf,
    format: ArchiveFormat,
    name: String,
    version: Version,
}

impl ArchivePackage {
    fn unpack_zip(&self, dest: &Path) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| {
            Error::IoError(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        debug!("Unpacking {} zip entries", archive.len());
        archive.extract(dest)?;

        // Directories last, writing their entries touches their times
        let mut directories = Vec::new();
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            let (Some(path), Some(mtime)) =
                (entry.enclosed_name(), entry.last_modified().and_then(zip_mtime))
            else {
                continue;
            };
            if entry.is_dir() {
                directories.push((dest.join(path), mtime));
            } else {
                set_mtime(&dest.join(path), mtime);
            }
        }
        for (path, mtime) in directories.iter().rev() {
            set_mtime(path, *mtime);
        }

        Ok(())
    }

    fn unpack_tar(&self, dest: &Path) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| {
            Error::IoError(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let reader: Box<dyn Read> = match self.format {
            ArchiveFormat::TarZst => {
                let decoder = zstd::Decoder::new(file).map_err(|e| {
                    Error::IoError(format!("Failed to create zstd decoder: {}", e))
                })?;
                Box::new(decoder)
            }
            ArchiveFormat::TarXz => Box::new(XzDecoder::new(file)),
            ArchiveFormat::TarGz | ArchiveFormat::Zip => Box::new(GzDecoder::new(file)),
        };

        tar::Archive::new(reader).unpack(dest).map_err(|e| {
            Error::IoError(format!("Failed to unpack {}: {}", self.path.display(), e))
        })
    }
}

/// Zip timestamps carry no zone; they are taken as UTC
fn zip_mtime(modified: zip::DateTime) -> Option<FileTime> {
    let date = NaiveDate::from_ymd_opt(
        modified.year().into(),
        modified.month().into(),
        modified.day().into(),
    )?;
    let time = date.and_hms_opt(
        modified.hour().into(),
        modified.minute().into(),
        modified.second().into(),
    )?;
    Some(FileTime::from_unix_time(time.and_utc().timestamp(), 0))
}

fn set_mtime(path: &Path, mtime: FileTime) {
    if let Err(e) = filetime::set_file_times(path, mtime, mtime) {
        warn!("Failed to set times of {}: {}", path.display(), e);
    }
}

impl PackageArchive for ArchivePackage {
    fn open(path: &Path) -> Result<Self> {
        let format = ArchiveFormat::detect(path)?;
        let package = PackageRef::parse(&path.to_string_lossy())?;
        let version = package.version.ok_or_else(|| {
            Error::ParseError(format!(
                "Archive {} has no version in its filename",
                path.display()
            ))
        })?;

        if !path.is_file() {
            return Err(Error::NotFoundError(format!(
                "Package archive {} does not exist",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            format,
            name: package.name,
            version,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &Version {
        &self.version
    }

    fn unpack_to(&self, dest: &Path) -> Result<()> {
        debug!("Unpacking {} to {}", self.path.display(), dest.display());
        match self.format {
            ArchiveFormat::Zip => self.unpack_zip(dest),
            _ => self.unpack_tar(dest),
        }
    }
}
