// src/reconcile/merge.rs

use super::SideArtifact;
use crate::db::InstalledPackage;
use crate::error::{Error, Result};
use crate::filesystem::{exists, target_path, try_delete};
use crate::operator::Operator;
use std::path::Path;
use tracing::{info, trace};

/// Merge the side artifacts of a package's preserved files
///
/// For every preserved file, each existing `.backup`, `.new` and `.save`
/// artifact is handed to the operator's merge tool together with the
/// tracked file. The artifact is deleted only if the operator confirms.
/// Returns the number of artifacts merged.
pub fn merge_config(
    package: &InstalledPackage,
    prefix: &Path,
    operator: &dyn Operator,
) -> Result<usize> {
    let mut merged = 0;

    for file in &package.preserve {
        let target = target_path(prefix, file)?;
        for kind in SideArtifact::ALL {
            let artifact = kind.path_for(&target);
            if !exists(&artifact) {
                continue;
            }

            info!("Found {}, running merge", artifact.display());
            if !operator.merge(&target, &artifact)? {
                return Err(Error::MergeError(format!(
                    "Merge of {} into {} failed",
                    artifact.display(),
                    target.display()
                )));
            }
            merged += 1;

            if operator.confirm(&format!("delete {}?", artifact.display()), false)? {
                trace!("D {}", artifact.display());
                try_delete(&artifact)?;
            }
        }
    }

    Ok(merged)
}
