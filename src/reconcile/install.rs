// src/reconcile/install.rs

use super::{
    FileAction, Reconciliation, Report, SideArtifact, create_directories,
    restore_directory_attributes,
};
use crate::db::InstalledPackage;
use crate::error::{Error, Result};
use crate::filesystem::{exists, move_file, target_path};
use crate::hash::fingerprint;
use crate::packages::ArchiveManifest;
use crate::version::Version;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Install an unpacked archive under `prefix`
///
/// Without `force`, any payload file that already exists under the prefix
/// aborts the install before anything is written. With `force`, existing
/// files are replaced, except that an existing preserved file is first moved
/// aside to `.save`.
///
/// Payload files are moved out of the unpack directory into place.
pub fn install(
    manifest: &ArchiveManifest,
    version: &Version,
    prefix: &Path,
    force: bool,
) -> Result<Reconciliation> {
    if !force {
        check_conflicts(manifest, prefix)?;
    }

    let mut report = Report::default();

    let created = create_directories(manifest, prefix, &mut report)?;

    let mut fingerprints = BTreeMap::new();
    for file in &manifest.files {
        let source = manifest.source_path(file);
        let target = target_path(prefix, file)?;

        if exists(&target) && manifest.is_preserved(file) {
            let artifact = SideArtifact::Save.path_for(&target);
            info!(
                "Saving untracked {} as {}",
                target.display(),
                artifact.display()
            );
            move_file(&target, &artifact)?;
            report.push(FileAction::MovedAside {
                path: file.clone(),
                artifact,
            });
        }

        let sum = fingerprint(&source)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        move_file(&source, &target)?;
        report.push(FileAction::Wrote(file.clone()));
        fingerprints.insert(file.clone(), sum);
    }

    restore_directory_attributes(&created);

    debug!(
        "Installed {} files and {} directories",
        fingerprints.len(),
        manifest.directories.len()
    );

    let package = InstalledPackage::new(
        version.clone(),
        fingerprints,
        manifest.directories.clone(),
        manifest.preserve.clone(),
    );

    Ok(Reconciliation { package, report })
}

fn check_conflicts(manifest: &ArchiveManifest, prefix: &Path) -> Result<()> {
    for file in &manifest.files {
        let target = target_path(prefix, file)?;
        if exists(&target) {
            return Err(Error::ConflictError(format!(
                "File exists: {}",
                target.display()
            )));
        }
    }
    Ok(())
}
