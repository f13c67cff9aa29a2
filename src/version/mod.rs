// src/version/mod.rs

//! Package references, versions and the archive filename grammar
//!
//! Archives are named `name-number-release.atxpkg.<archive-type>`, where
//! `number` is dotted-numeric (`1.2.3`, `20240722223043`) and `release` is an
//! integer. Versions compare segment by segment, numerically where both
//! segments are numeric, with the release breaking ties.
//!
//! Name/version splitting is done from the right: the last two hyphen
//! separated tokens form the version if they match `<dotted-numeric>-<integer>`.
//! A name that itself ends in a dotted-numeric token (`foo-2-1.0-1`,
//! `foo-1.0`) is rejected as ambiguous instead of guessed at.

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

/// Marker between the package version and the archive type in filenames
pub const PACKAGE_EXTENSION: &str = "atxpkg";

/// Supported archive types, in the order they are tried
pub const ARCHIVE_TYPES: &[&str] = &["zip", "tar.gz", "tar.zst", "tar.xz"];

static PACKAGE_FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.\-]+-[\d.]+-\d+\.atxpkg\.(zip|tar\.gz|tar\.zst|tar\.xz)$")
        .expect("package filename regex is valid")
});

/// A package version: dotted version number plus integer release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub number: String,
    pub release: String,
}

impl Version {
    /// Parse a `number-release` string such as `3.5.6-1`
    pub fn parse(s: &str) -> Result<Self> {
        let (number, release) = s
            .rsplit_once('-')
            .ok_or_else(|| Error::ParseError(format!("Version '{}' has no release", s)))?;

        if !is_dotted_numeric(number) {
            return Err(Error::ParseError(format!(
                "Invalid version number '{}' in '{}'",
                number, s
            )));
        }
        if !is_integer(release) {
            return Err(Error::ParseError(format!(
                "Invalid release '{}' in '{}'",
                release, s
            )));
        }

        Ok(Self {
            number: number.to_string(),
            release: release.to_string(),
        })
    }

    /// Compare two versions
    ///
    /// Numbers are compared as dot-separated segments, then releases as
    /// integers. Versions that are numerically equal but spelled differently
    /// (`1.0` vs `1.00`) fall back to a plain string comparison so the
    /// ordering stays total.
    pub fn compare(&self, other: &Version) -> Ordering {
        compare_dotted(&self.number, &other.number)
            .then_with(|| compare_segment(&self.release, &other.release))
            .then_with(|| self.number.cmp(&other.number))
            .then_with(|| self.release.cmp(&other.release))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.release)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A package name with an optional version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub version: Option<Version>,
}

impl PackageRef {
    /// Create a reference to any version of a package
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Parse a package reference out of a filename, URL or bare token
    ///
    /// Accepted forms:
    /// - `http://host/repo/name-1.2-3.atxpkg.zip` → name, version 1.2-3
    /// - `name-1.2-3.atxpkg.zip` / `name-1.2-3` → name, version 1.2-3
    /// - `name` → name, no version
    pub fn parse(token: &str) -> Result<Self> {
        let stem = strip_archive_suffix(package_filename(token));

        let mut parts = stem.rsplitn(3, '-');
        let release = parts.next();
        let number = parts.next();
        let name = parts.next();

        let (name, version) = match (name, number, release) {
            (Some(name), Some(number), Some(release))
                if is_dotted_numeric(number) && is_integer(release) =>
            {
                let version = Version {
                    number: number.to_string(),
                    release: release.to_string(),
                };
                (name, Some(version))
            }
            _ => (stem, None),
        };

        validate_name(name, token)?;

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}-{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for PackageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn validate_name(name: &str, token: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ParseError(format!(
            "Empty package name in '{}'",
            token
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
    {
        return Err(Error::ParseError(format!(
            "Invalid characters in package name '{}'",
            name
        )));
    }

    // A trailing numeric token means the split point is ambiguous
    if let Some((_, last)) = name.rsplit_once('-') {
        if is_dotted_numeric(last) {
            return Err(Error::ParseError(format!(
                "Ambiguous package reference '{}': name '{}' ends in a version-like token",
                token, name
            )));
        }
    }

    Ok(())
}

/// Last path segment of a URL or filesystem path
pub fn package_filename(url: &str) -> &str {
    url.rsplit(['/', '\\']).next().unwrap_or(url)
}

/// Strip a trailing `.atxpkg.<archive-type>` suffix, if present
pub fn strip_archive_suffix(filename: &str) -> &str {
    for archive_type in ARCHIVE_TYPES {
        let suffix = format!(".{}.{}", PACKAGE_EXTENSION, archive_type);
        if let Some(stem) = filename.strip_suffix(suffix.as_str()) {
            return stem;
        }
    }
    filename
}

/// Whether a filename is an installable package archive
///
/// The name must match `name-dottedversion-integer.atxpkg.<archive-type>`
/// and split unambiguously into a name and a version.
pub fn is_valid_package_filename(filename: &str) -> bool {
    PACKAGE_FILENAME_RE.is_match(filename)
        && PackageRef::parse(filename).is_ok_and(|r| r.version.is_some())
}

/// Whether a filename carries one of the package archive extensions
pub fn has_package_extension(filename: &str) -> bool {
    strip_archive_suffix(filename).len() != filename.len()
}

/// Return the URL whose filename carries the greatest version
///
/// URLs whose filename has no parseable version are skipped. Equal
/// versions are broken by the lexically smallest URL so the result does not
/// depend on input order.
pub fn max_version<S: AsRef<str>>(urls: &[S]) -> Result<&str> {
    let mut best: Option<(Version, &str)> = None;

    for url in urls {
        let url = url.as_ref();
        let Some(version) = PackageRef::parse(url).ok().and_then(|r| r.version) else {
            warn!("Ignoring {} without a package version", url);
            continue;
        };

        let replace = match &best {
            None => true,
            Some((best_version, best_url)) => match version.cmp(best_version) {
                Ordering::Greater => true,
                Ordering::Equal => url < *best_url,
                Ordering::Less => false,
            },
        };
        if replace {
            best = Some((version, url));
        }
    }

    best.map(|(_, url)| url)
        .ok_or_else(|| Error::NotFoundError("No versioned package among candidates".to_string()))
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_dotted_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit()) && s.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

fn compare_dotted(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => match compare_segment(l, r) {
                Ordering::Equal => continue,
                ord => return ord,
            },
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Numeric segments compare as integers of any length; numeric sorts after text
fn compare_segment(a: &str, b: &str) -> Ordering {
    match (is_integer(a), is_integer(b)) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (false, false) => a.cmp(b),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}
