// src/commands/query.rs

use super::Session;
use crate::db::{InstalledPackage, Ledger};
use crate::error::{Error, Result};
use crate::filesystem::{exists, target_path};
use crate::hash::fingerprint;
use crate::packages::manifest::to_unix_path;
use crate::repository;
use crate::version::{PackageRef, Version};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Verify installed packages against the disk, all of them if none are given
///
/// Prints one line per problem and returns the number of problems found:
/// tracked paths that are missing, and non-preserved files whose content no
/// longer matches the recorded fingerprint.
pub fn check_packages(session: &Session<'_>, packages: &[String]) -> Result<usize> {
    let requests = session.requested_or_installed(packages);

    let mut entries = Vec::with_capacity(requests.len());
    for token in &requests {
        let package = PackageRef::parse(token)?;
        entries.push((package.name.clone(), session.installed(&package)?));
    }

    let mut problems = 0;
    for (name, entry) in entries {
        for problem in check_package(entry, &session.config.prefix)? {
            println!("{}: {}", name, problem);
            problems += 1;
        }
    }

    Ok(problems)
}

fn check_package(entry: &InstalledPackage, prefix: &Path) -> Result<Vec<String>> {
    let mut problems = Vec::new();

    for path in entry.tracked_paths() {
        let target = target_path(prefix, path)?;
        if !exists(&target) {
            problems.push(format!("does not exist: {}", target.display()));
        }
    }

    for (path, sum) in &entry.fingerprints {
        if entry.is_preserved(path) {
            continue;
        }
        let target = target_path(prefix, path)?;
        if let Ok(current) = fingerprint(&target) {
            if &current != sum {
                problems.push(format!("checksum difference: {}", target.display()));
            }
        }
    }

    Ok(problems)
}

/// Packages offered by the repositories
///
/// Without arguments, every package name once with no version. With
/// package names, every offered version of each of them.
pub fn list_available(
    session: &Session<'_>,
    packages: &[String],
) -> Result<Vec<(String, Option<Version>)>> {
    let client = session.client()?;
    let available =
        client.available_packages(&session.config.repositories()?, session.options.offline);

    if packages.is_empty() {
        return Ok(available.names().map(|name| (name.clone(), None)).collect());
    }

    let mut listed = Vec::new();
    for name in packages {
        for version in available.versions(name)? {
            listed.push((name.clone(), Some(version)));
        }
    }
    Ok(listed)
}

/// Installed packages with their versions and install times, by name
pub fn list_installed(ledger: &Ledger) -> Vec<(String, Version, Option<DateTime<Utc>>)> {
    ledger
        .iter()
        .map(|(name, entry)| (name.clone(), entry.version.clone(), entry.installed_at_utc()))
        .collect()
}

/// Files and directories under `paths` that no installed package tracks
///
/// Without paths, the top-level entries of every tracked path are searched.
pub fn show_untracked(session: &Session<'_>, paths: &[String]) -> Result<Vec<String>> {
    let tracked: BTreeSet<&str> = session
        .ledger
        .iter()
        .flat_map(|(_, entry)| entry.tracked_paths())
        .map(String::as_str)
        .collect();

    let roots: Vec<String> = if paths.is_empty() {
        tracked
            .iter()
            .map(|path| path.split('/').next().unwrap_or_default().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        paths
            .iter()
            .map(|p| p.trim_matches('/').to_string())
            .collect()
    };
    debug!("Searching for untracked files in {:?}", roots);

    let mut untracked = Vec::new();
    for root in &roots {
        let dir = target_path(&session.config.prefix, root)?;
        if !dir.is_dir() {
            if !exists(&dir) {
                warn!("{} does not exist", dir.display());
            } else if !tracked.contains(root.as_str()) {
                untracked.push(root.clone());
            }
            continue;
        }

        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let path = format!("{}/{}", root, to_unix_path(relative));
            if !tracked.contains(path.as_str()) {
                untracked.push(path);
            }
        }
    }

    Ok(untracked)
}

/// Empty the download cache; returns the deleted paths
pub fn clean_cache(session: &Session<'_>) -> Result<Vec<String>> {
    repository::clean_cache(&session.config.cache_dir)
}

/// Fail unless every listed package (`name` or `name-version`) is installed
pub fn if_installed(ledger: &Ledger, packages: &[String]) -> Result<()> {
    for token in packages {
        let package = PackageRef::parse(token)?;
        let installed = ledger.get(&package.name).is_some_and(|entry| {
            package
                .version
                .as_ref()
                .is_none_or(|version| version == &entry.version)
        });
        if !installed {
            return Err(Error::NotFoundError(format!("Package {} not installed", package)));
        }
    }
    Ok(())
}
