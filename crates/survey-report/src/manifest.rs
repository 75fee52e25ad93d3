//! Run manifest, artifact digests and removal of stale outputs.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use survey_model::Manifest;

use crate::error::{ReportError, Result};
use crate::layout::MANIFEST;

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// The manifest a previous run left in `output_dir`, if readable.
pub fn read_previous_manifest(output_dir: &Path) -> Option<Manifest> {
    let path = output_dir.join(MANIFEST);
    let text = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(manifest) => Some(manifest),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable previous manifest");
            None
        }
    }
}

pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = output_dir.join(MANIFEST);
    let mut json = serde_json::to_string_pretty(manifest).map_err(|source| {
        ReportError::Manifest {
            path: path.clone(),
            source,
        }
    })?;
    json.push('\n');
    fs::write(&path, json).map_err(|e| ReportError::io("write", &path, e))
}

/// True for a non-empty relative path that stays below its base.
fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    !relative.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Delete files a previous run listed that the current run did not produce.
///
/// Returns the removed paths. Entries that would resolve outside
/// `output_dir` are skipped.
pub fn remove_stale(
    output_dir: &Path,
    previous: &Manifest,
    current: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for relative in previous.paths() {
        if current.contains(relative) || relative == MANIFEST {
            continue;
        }
        if !is_contained(relative) {
            warn!(path = relative, "ignoring manifest entry outside the output directory");
            continue;
        }
        let path = output_dir.join(relative);
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|e| ReportError::io("remove", &path, e))?;
        debug!(path = relative, "removed stale artifact");
        removed.push(relative.to_string());
    }
    Ok(removed)
}
