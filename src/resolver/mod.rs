// src/resolver/mod.rs

//! Package resolution against repository listings
//!
//! Repository listings are flattened into a map from package name to every
//! archive URL (or local path) offering that package. Only filenames that
//! match the archive grammar make it into the map. Resolution then picks
//! either the exact requested version or the greatest available one.

use crate::error::{Error, Result};
use crate::version::{PackageRef, Version, is_valid_package_filename, max_version, package_filename};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Archive locations offered by all repositories, grouped by package name
#[derive(Debug, Clone, Default)]
pub struct AvailablePackages {
    packages: BTreeMap<String, Vec<String>>,
}

impl AvailablePackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat list of archive locations
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut available = Self::new();
        for url in urls {
            available.add(url.as_ref());
        }
        available
    }

    /// Add one archive location; returns false if its filename is not a
    /// valid package archive name
    pub fn add(&mut self, url: &str) -> bool {
        let filename = package_filename(url);
        if !is_valid_package_filename(filename) {
            warn!("{} is not a valid package filename", filename);
            return false;
        }
        let Ok(package) = PackageRef::parse(filename) else {
            return false;
        };

        let urls = self.packages.entry(package.name).or_default();
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
        true
    }

    /// Merge another set of locations into this one
    pub fn extend(&mut self, other: AvailablePackages) {
        for (name, urls) in other.packages {
            let entry = self.packages.entry(name).or_default();
            for url in urls {
                if !entry.contains(&url) {
                    entry.push(url);
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.packages.get(name).map(Vec::as_slice)
    }

    /// Package names, sorted
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.packages.keys()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Distinct versions offered for a package, ascending
    pub fn versions(&self, name: &str) -> Result<Vec<Version>> {
        let urls = self
            .get(name)
            .ok_or_else(|| Error::NotFoundError(format!("Package {} not available", name)))?;

        let mut versions: Vec<Version> = urls
            .iter()
            .filter_map(|url| PackageRef::parse(url).ok().and_then(|r| r.version))
            .collect();
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// Pick the archive location for a package reference
    ///
    /// With a version, the first location carrying exactly that version is
    /// returned. Without one, the location with the greatest version wins.
    pub fn resolve(&self, package: &PackageRef) -> Result<&str> {
        let urls = self.packages.get(&package.name).ok_or_else(|| {
            Error::NotFoundError(format!("Unable to find url for package {}", package.name))
        })?;

        let url = match &package.version {
            Some(version) => urls
                .iter()
                .find(|url| {
                    PackageRef::parse(url)
                        .ok()
                        .and_then(|r| r.version)
                        .as_ref()
                        == Some(version)
                })
                .map(String::as_str)
                .ok_or_else(|| Error::NotFoundError(format!("Package {} not available", package)))?,
            None => max_version(urls.as_slice())?,
        };

        debug!("Resolved {} to {}", package, url);
        Ok(url)
    }
}
