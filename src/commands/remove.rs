// src/commands/remove.rs

use super::Session;
use crate::error::Result;
use crate::reconcile;
use crate::version::PackageRef;
use tracing::info;

/// Remove installed packages; each may be `name` or `name-version`
///
/// Returns whether anything was removed.
pub fn remove_packages(session: &mut Session<'_>, packages: &[String]) -> Result<bool> {
    let mut names = Vec::with_capacity(packages.len());
    for token in packages {
        let package = PackageRef::parse(token)?;
        let entry = session.installed(&package)?;
        println!("remove {}-{}", package.name, entry.version);
        names.push(package.name);
    }

    if !session.proceed(false)? {
        return Ok(false);
    }

    for name in &names {
        let Some(entry) = session.ledger.get(name) else {
            continue;
        };
        let version = entry.version.clone();
        info!("Removing {}-{}", name, version);

        reconcile::remove(entry, &session.config.prefix)?;

        session.ledger.remove(name);
        session.save()?;
        println!("{}-{} removed", name, version);
    }

    Ok(true)
}

/// Merge the side artifacts of every preserved file of the given packages
///
/// Returns the number of artifacts merged.
pub fn merge_config(session: &Session<'_>, packages: &[String]) -> Result<usize> {
    let requests = session.requested_or_installed(packages);

    let mut entries = Vec::with_capacity(requests.len());
    for token in &requests {
        let package = PackageRef::parse(token)?;
        entries.push((package.name.clone(), session.installed(&package)?));
    }

    let mut merged = 0;
    for (name, entry) in entries {
        info!("Merging configuration of {}", name);
        merged += reconcile::merge_config(entry, &session.config.prefix, session.operator())?;
    }

    Ok(merged)
}
