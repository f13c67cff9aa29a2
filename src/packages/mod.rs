// src/packages/mod.rs

//! Package archive support for atxpkg
//!
//! This module unpacks package archives and reads the manifest of the
//! unpacked payload. Each archive format implements the `PackageArchive`
//! trait.

pub mod archive;
pub mod manifest;
pub mod traits;

pub use archive::{ArchiveFormat, ArchivePackage};
pub use manifest::ArchiveManifest;
pub use traits::PackageArchive;

use crate::error::Result;
use crate::version::Version;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

/// An archive unpacked into a scratch directory
///
/// The scratch directory is removed when this value is dropped.
pub struct UnpackedPackage {
    pub name: String,
    pub version: Version,
    pub manifest: ArchiveManifest,
    _dir: TempDir,
}

/// Unpack an archive under `tmp_parent` and read its manifest
pub fn unpack(archive_path: &Path, tmp_parent: &Path) -> Result<UnpackedPackage> {
    let package = ArchivePackage::open(archive_path)?;
    info!("Unpacking {}-{}", package.name(), package.version());

    let dir = tempfile::Builder::new()
        .prefix("unpack-")
        .tempdir_in(tmp_parent)?;
    package.unpack_to(dir.path())?;
    let manifest = ArchiveManifest::read(dir.path())?;

    Ok(UnpackedPackage {
        name: package.name().to_string(),
        version: package.version().clone(),
        manifest,
        _dir: dir,
    })
}
