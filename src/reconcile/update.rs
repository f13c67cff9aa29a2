// src/reconcile/update.rs

use super::{
    FileAction, Reconciliation, Report, SideArtifact, create_directories, deepest_first,
    restore_directory_attributes,
};
use crate::db::InstalledPackage;
use crate::error::{Error, Result};
use crate::filesystem::{
    exists, move_file, prune_empty_parents, remove_dir_if_empty, target_path, try_delete,
};
use crate::hash::fingerprint;
use crate::packages::ArchiveManifest;
use crate::version::Version;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Replace an installed package with the content of an unpacked archive
///
/// Per payload file:
/// - missing on disk: written
/// - preserved by the new archive: skipped when the packaged content did not
///   change between versions or the disk already holds the new content,
///   replaced when the disk still holds the previously installed content,
///   otherwise the new content goes to `.new` beside the user's file
/// - anything else: written, unless the disk already holds the new content
///
/// Files of the old package that the archive no longer contains are then
/// deleted, except preserved files the user changed, which move to `.save`.
/// Directories of the old package that are gone from the archive are removed
/// when empty.
pub fn update(
    manifest: &ArchiveManifest,
    old: &InstalledPackage,
    version: &Version,
    prefix: &Path,
    force: bool,
) -> Result<Reconciliation> {
    if !force {
        check_conflicts(manifest, old, prefix)?;
    }

    let mut report = Report::default();

    let created = create_directories(manifest, prefix, &mut report)?;

    let mut fingerprints = BTreeMap::new();
    for file in &manifest.files {
        let source = manifest.source_path(file);
        let target = target_path(prefix, file)?;
        let sum_new = fingerprint(&source)?;

        if !exists(&target) {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            move_file(&source, &target)?;
            report.push(FileAction::Wrote(file.clone()));
        } else if manifest.is_preserved(file) {
            let sum_original = old.fingerprints.get(file);
            let sum_current = match fingerprint(&target) {
                Ok(sum) => sum,
                Err(e) => {
                    warn!("Leaving {}: {}", target.display(), e);
                    report.push(FileAction::Unreadable(file.clone()));
                    fingerprints.insert(file.clone(), sum_new);
                    continue;
                }
            };

            if sum_original == Some(&sum_new) {
                trace!("{} unchanged between versions", file);
                report.push(FileAction::Skipped(file.clone()));
            } else if sum_current == sum_new {
                trace!("{} already has the new content", file);
                report.push(FileAction::Skipped(file.clone()));
            } else if sum_original == Some(&sum_current) {
                trace!("{} not modified locally, replacing", file);
                move_file(&source, &target)?;
                report.push(FileAction::Wrote(file.clone()));
            } else {
                let artifact = SideArtifact::New.path_for(&target);
                info!(
                    "{} changed, installing new version as {}",
                    target.display(),
                    artifact.display()
                );
                move_file(&source, &artifact)?;
                report.push(FileAction::SideInstalled {
                    path: file.clone(),
                    artifact,
                });
            }
        } else if fingerprint(&target).is_ok_and(|sum| sum == sum_new) {
            report.push(FileAction::Skipped(file.clone()));
        } else {
            move_file(&source, &target)?;
            report.push(FileAction::Wrote(file.clone()));
        }

        fingerprints.insert(file.clone(), sum_new);
    }

    remove_dropped_files(manifest, old, prefix, &mut report)?;
    remove_dropped_directories(manifest, old, prefix, &mut report)?;
    restore_directory_attributes(&created);

    debug!(
        "Update wrote {} files, skipped {}",
        report.written().len(),
        report.skipped().len()
    );

    let package = InstalledPackage::new(
        version.clone(),
        fingerprints,
        manifest.directories.clone(),
        manifest.preserve.clone(),
    );

    Ok(Reconciliation { package, report })
}

fn check_conflicts(manifest: &ArchiveManifest, old: &InstalledPackage, prefix: &Path) -> Result<()> {
    for file in &manifest.files {
        let target = target_path(prefix, file)?;
        if exists(&target) && !old.fingerprints.contains_key(file) {
            return Err(Error::ConflictError(format!(
                "{} already exists but is not part of the installed package",
                target.display()
            )));
        }
    }
    Ok(())
}

fn remove_dropped_files(
    manifest: &ArchiveManifest,
    old: &InstalledPackage,
    prefix: &Path,
    report: &mut Report,
) -> Result<()> {
    for (file, sum_old) in &old.fingerprints {
        if manifest.files.contains(file) {
            continue;
        }

        let target = target_path(prefix, file)?;
        if !exists(&target) {
            warn!("File {} does not exist", target.display());
            report.push(FileAction::Missing(file.clone()));
            continue;
        }
        if target.is_dir() {
            trace!("{} is a directory now, leaving it", file);
            continue;
        }

        if old.is_preserved(file) {
            let sum_current = match fingerprint(&target) {
                Ok(sum) => sum,
                Err(e) => {
                    warn!("Leaving {}: {}", target.display(), e);
                    report.push(FileAction::Unreadable(file.clone()));
                    continue;
                }
            };
            if &sum_current != sum_old {
                let artifact = SideArtifact::Save.path_for(&target);
                info!(
                    "Saving changed {} as {}",
                    target.display(),
                    artifact.display()
                );
                match move_file(&target, &artifact) {
                    Ok(()) => report.push(FileAction::MovedAside {
                        path: file.clone(),
                        artifact,
                    }),
                    Err(e) => {
                        warn!("Leaving {}: {}", target.display(), e);
                        report.push(FileAction::Failed(file.clone()));
                    }
                }
                continue;
            }
        }

        if let Err(e) = try_delete(&target) {
            warn!("Failed to delete {}: {}", target.display(), e);
            report.push(FileAction::Failed(file.clone()));
            continue;
        }
        report.push(FileAction::Deleted(file.clone()));
        for dir in prune_empty_parents(prefix, file, &manifest.directories) {
            report.push(FileAction::RemovedDir(dir));
        }
    }

    Ok(())
}

fn remove_dropped_directories(
    manifest: &ArchiveManifest,
    old: &InstalledPackage,
    prefix: &Path,
    report: &mut Report,
) -> Result<()> {
    let dropped = old
        .directories
        .iter()
        .filter(|dir| !manifest.directories.contains(*dir));

    for dir in deepest_first(dropped) {
        let target = target_path(prefix, dir)?;
        if !target.is_dir() {
            continue;
        }
        if remove_dir_if_empty(&target) {
            report.push(FileAction::RemovedDir(dir.clone()));
        }
    }

    Ok(())
}
