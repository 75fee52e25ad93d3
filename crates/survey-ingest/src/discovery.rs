//! Dataset file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Directories searched when no dataset path is given. Files from all of
/// them are used, in this order.
pub const DEFAULT_DATA_DIRS: &[&str] = &["data", "."];

/// File extensions read as survey exports (case-insensitive).
pub const DATASET_EXTENSIONS: &[&str] = &["csv", "xlsx"];

/// Lists all CSV and Excel files in a directory.
///
/// Returns files sorted by filename. Office lock files (`~$name.xlsx`) are
/// skipped.
pub fn list_dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if is_lock_file {
            continue;
        }

        let is_dataset = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                DATASET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if is_dataset {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Resolve the dataset files for a run.
///
/// - an explicit file is used as is;
/// - an explicit directory contributes all of its dataset files;
/// - without a path, every directory in [`DEFAULT_DATA_DIRS`] under `base`
///   is searched and the files of all of them are used, `data/` first.
pub fn resolve_dataset_paths(explicit: Option<&Path>, base: &Path) -> Result<Vec<PathBuf>> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if path.is_dir() {
            let files = list_dataset_files(path)?;
            if files.is_empty() {
                return Err(IngestError::NoDataFiles {
                    searched: path.display().to_string(),
                });
            }
            return Ok(files);
        }
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut searched = Vec::new();
    let mut files = Vec::new();
    for candidate in DEFAULT_DATA_DIRS {
        let dir = base.join(candidate);
        searched.push(dir.display().to_string());
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "data directory absent");
            continue;
        }
        let found = list_dataset_files(&dir)?;
        debug!(dir = %dir.display(), files = found.len(), "searched data directory");
        files.extend(found);
    }
    if files.is_empty() {
        return Err(IngestError::NoDataFiles {
            searched: searched.join(", "),
        });
    }
    Ok(files)
}
