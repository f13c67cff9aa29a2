// src/commands/install.rs

use super::Session;
use crate::error::{Error, Result};
use crate::packages;
use crate::reconcile;
use crate::version::{PackageRef, Version};
use std::collections::BTreeSet;
use tracing::info;

/// Install packages from the configured repositories
///
/// Every requested package is resolved before anything is downloaded.
/// Returns whether anything was installed.
pub fn install_packages(session: &mut Session<'_>, packages: &[String]) -> Result<bool> {
    let options = session.options;

    let mut requested = Vec::with_capacity(packages.len());
    let mut seen = BTreeSet::new();
    for token in packages {
        let package = PackageRef::parse(token)?;
        if !seen.insert(package.name.clone()) {
            return Err(requested_twice(&package.name));
        }
        if session.ledger.contains(&package.name) && !options.force && !options.download_only {
            return Err(Error::AlreadyInstalled(package.name));
        }
        requested.push(package);
    }

    let client = session.client()?;
    let available = client.available_packages(&session.config.repositories()?, options.offline);

    let mut urls = Vec::with_capacity(requested.len());
    for package in &requested {
        let url = available.resolve(package)?;
        let resolved = PackageRef::parse(url)?;
        if options.download_only {
            println!("download {}", resolved);
        } else {
            println!("install {}", resolved);
        }
        urls.push(url.to_string());
    }

    if !session.proceed(true)? {
        return Ok(false);
    }

    let archives = session.fetch(&client, &urls)?;
    if options.download_only {
        return Ok(false);
    }

    for archive in &archives {
        let unpacked = packages::unpack(archive, &session.config.tmp_dir)?;
        let reconciled = reconcile::install(
            &unpacked.manifest,
            &unpacked.version,
            &session.config.prefix,
            options.force,
        )?;

        session.ledger.insert(&unpacked.name, reconciled.package);
        session.save()?;

        info!("{}-{} installed", unpacked.name, unpacked.version);
        println!("{}-{} is now installed", unpacked.name, unpacked.version);
    }

    Ok(true)
}

/// One planned update, possibly to a differently named package
#[derive(Debug)]
struct PlannedUpdate {
    old_name: String,
    old_version: Version,
    new: PackageRef,
    url: String,
}

/// Update installed packages, all of them if none are requested
///
/// A request is `name`, `name-version` or `old..new` to switch an installed
/// package to a differently named one. The whole batch is validated before
/// anything is downloaded. Returns whether anything was updated.
pub fn update_packages(session: &mut Session<'_>, packages: &[String]) -> Result<bool> {
    let options = session.options;
    let requests = session.requested_or_installed(packages);

    let mut planned = Vec::with_capacity(requests.len());
    let mut seen = BTreeSet::new();
    for token in &requests {
        let (old, new) = match token.split_once("..") {
            Some((old, new)) => (PackageRef::parse(old)?, PackageRef::parse(new)?),
            None => {
                let new = PackageRef::parse(token)?;
                (PackageRef::new(new.name.clone()), new)
            }
        };
        let entry = session.installed(&old)?;
        if old.name != new.name && session.ledger.contains(&new.name) {
            return Err(Error::AlreadyInstalled(new.name));
        }
        if !seen.insert(old.name.clone()) {
            return Err(requested_twice(&old.name));
        }
        if old.name != new.name && !seen.insert(new.name.clone()) {
            return Err(requested_twice(&new.name));
        }
        planned.push((old.name, entry.version.clone(), new));
    }

    let client = session.client()?;
    let available = client.available_packages(&session.config.repositories()?, options.offline);

    let mut updates = Vec::with_capacity(planned.len());
    for (old_name, old_version, new) in planned {
        let url = available.resolve(&new)?.to_string();
        let new = PackageRef::parse(&url)?;
        updates.push(PlannedUpdate {
            old_name,
            old_version,
            new,
            url,
        });
    }

    updates.retain(|u| {
        options.force || u.old_name != u.new.name || Some(&u.old_version) != u.new.version.as_ref()
    });

    if updates.is_empty() {
        println!("nothing to update");
        return Ok(false);
    }

    for u in &updates {
        println!("update {}-{} -> {}", u.old_name, u.old_version, u.new);
    }
    if !session.proceed(true)? {
        return Ok(false);
    }

    let urls: Vec<String> = updates.iter().map(|u| u.url.clone()).collect();
    let archives = session.fetch(&client, &urls)?;
    if options.download_only {
        return Ok(false);
    }

    for (u, archive) in updates.iter().zip(&archives) {
        let unpacked = packages::unpack(archive, &session.config.tmp_dir)?;
        let old = session
            .ledger
            .get(&u.old_name)
            .ok_or_else(|| Error::NotFoundError(format!("Package {} not installed", u.old_name)))?;

        let reconciled = reconcile::update(
            &unpacked.manifest,
            old,
            &unpacked.version,
            &session.config.prefix,
            options.force,
        )?;

        session
            .ledger
            .replace(&u.old_name, &unpacked.name, reconciled.package);
        session.save()?;

        info!(
            "{}-{} updated to {}-{}",
            u.old_name, u.old_version, unpacked.name, unpacked.version
        );
        println!(
            "{}-{} updated to {}-{}",
            u.old_name, u.old_version, unpacked.name, unpacked.version
        );
    }

    Ok(true)
}

fn requested_twice(name: &str) -> Error {
    Error::ParseError(format!("Package {} requested more than once", name))
}
