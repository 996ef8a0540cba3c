//! File router
//!
//! Relocates the source file after a run: consistent files go to the
//! archive directory, divergent ones to the error directory for manual
//! review. The move is all-or-nothing and preserves the original file name
//! and bytes; a failed move surfaces as a persistence error so the caller
//! never sees a success that did not happen.

use crate::types::{SplitError, Verdict};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Move the processed source file according to the verdict
///
/// Returns the destination path. The target directory is created if needed;
/// `fs::rename` is used when possible, with a copy-then-remove fallback for
/// cross-device moves.
///
/// # Errors
///
/// [`SplitError::Persistence`] when the destination directory cannot be
/// created or the move fails. No partial state is reported as success: if
/// this returns an error, the source file may still be at its original
/// location, and the caller must not log the run as routed.
pub fn route(
    source: &Path,
    verdict: Verdict,
    archive_dir: &Path,
    error_dir: &Path,
) -> Result<PathBuf, SplitError> {
    let target_dir = match verdict {
        Verdict::Ok => archive_dir,
        Verdict::Divergent => error_dir,
    };
    move_into(source, target_dir)
}

/// Move a file into a directory, keeping its base name
pub fn move_into(source: &Path, target_dir: &Path) -> Result<PathBuf, SplitError> {
    fs::create_dir_all(target_dir)
        .map_err(|e| SplitError::persistence("creating the routing directory", &e))?;

    let file_name = source.file_name().ok_or_else(|| {
        SplitError::configuration(format!("input path '{}' has no file name", source.display()))
    })?;
    let destination = target_dir.join(file_name);

    if fs::rename(source, &destination).is_err() {
        // rename does not cross filesystems; fall back to copy + remove
        fs::copy(source, &destination)
            .map_err(|e| SplitError::persistence("copying the source file", &e))?;
        fs::remove_file(source)
            .map_err(|e| SplitError::persistence("removing the moved source file", &e))?;
    }

    info!("moved {} to {}", source.display(), destination.display());
    Ok(destination)
}
