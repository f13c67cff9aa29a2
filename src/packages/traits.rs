// src/packages/traits.rs

//! Common traits for package archive formats

use crate::error::Result;
use crate::version::Version;
use std::path::Path;

/// Common interface for all package archive formats (zip, tar.gz, ...)
pub trait PackageArchive {
    /// Open a package archive from the given path
    ///
    /// Name and version are taken from the archive filename, which must
    /// follow the `name-number-release.atxpkg.<archive-type>` grammar.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Get the package name
    fn name(&self) -> &str;

    /// Get the package version
    fn version(&self) -> &Version;

    /// Unpack the whole archive into `dest`, which must already exist
    fn unpack_to(&self, dest: &Path) -> Result<()>;
}
