// src/reconcile/remove.rs

use super::{FileAction, Report, SideArtifact, deepest_first};
use crate::db::InstalledPackage;
use crate::error::Result;
use crate::filesystem::{
    exists, move_file, prune_empty_parents, remove_dir_if_empty, target_path, try_delete,
};
use crate::hash::fingerprint;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// Remove an installed package's files and directories from `prefix`
///
/// Missing files are reported and skipped. A preserved file whose content
/// differs from the recorded fingerprint is renamed to `.backup` instead of
/// being deleted. Directories are only removed when empty. A file that
/// cannot be deleted or moved is reported and left in place.
pub fn remove(old: &InstalledPackage, prefix: &Path) -> Result<Report> {
    let mut report = Report::default();
    let keep = BTreeSet::new();

    for (file, sum) in &old.fingerprints {
        let target = target_path(prefix, file)?;
        if !exists(&target) {
            warn!("File {} does not exist", target.display());
            report.push(FileAction::Missing(file.clone()));
            continue;
        }

        if old.is_preserved(file) {
            match fingerprint(&target) {
                Ok(current) if &current != sum => {
                    let artifact = SideArtifact::Backup.path_for(&target);
                    info!("{} changed, saving as {}", target.display(), artifact.display());
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
                Ok(_) => {}
                Err(e) => {
                    warn!("Leaving {}: {}", target.display(), e);
                    report.push(FileAction::Unreadable(file.clone()));
                    continue;
                }
            }
        }

        if let Err(e) = try_delete(&target) {
            warn!("Failed to delete {}: {}", target.display(), e);
            report.push(FileAction::Failed(file.clone()));
            continue;
        }
        report.push(FileAction::Deleted(file.clone()));
        for dir in prune_empty_parents(prefix, file, &keep) {
            report.push(FileAction::RemovedDir(dir));
        }
    }

    for dir in deepest_first(&old.directories) {
        let target = target_path(prefix, dir)?;
        if !target.is_dir() {
            continue;
        }
        if remove_dir_if_empty(&target) {
            report.push(FileAction::RemovedDir(dir.clone()));
        }
    }

    info!(
        "Removed {} files, kept {} changed files",
        report.deleted().len(),
        report.artifacts().len()
    );

    Ok(report)
}
