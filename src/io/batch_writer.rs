//! Batch output writer
//!
//! Serializes merchant buckets into one output file per merchant under a
//! batch-labeled directory, plus a manifest listing what was written. The
//! naming is fully deterministic from `(batch id, merchant, kind)`, so
//! re-running a file under a fresh batch identifier reproduces the outputs
//! byte for byte.
//!
//! # Collision Semantics
//!
//! An existing target file means the batch identifier was already used.
//! That is a designed operator signal, not a race to resolve: the writer
//! fails with [`SplitError::BatchCollision`] before writing anything,
//! unless an explicit overwrite was requested. The collision check covers
//! every target path of the batch, so a partial earlier run cannot be
//! half-overwritten.

use crate::types::{BatchId, FileKind, MerchantBuckets, SplitError};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Manifest file name inside each batch directory
pub const MANIFEST_NAME: &str = "manifest.csv";

/// One written per-merchant output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Merchant the file belongs to
    pub merchant: String,

    /// Path of the written file
    pub path: PathBuf,

    /// Number of detail records in the file
    pub records: usize,
}

/// The materialized output of one run
///
/// Created at write time and never modified afterward; downstream consumers
/// (download endpoints, validators) only read it.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Batch identifier the outputs were written under
    pub id: BatchId,

    /// Directory holding the per-merchant files and the manifest
    pub dir: PathBuf,

    /// Written files in first-seen merchant order
    pub entries: Vec<BatchEntry>,

    /// Path of the batch manifest
    pub manifest: PathBuf,
}

/// Write all merchant buckets of one run into `<output_root>/<batch_id>/`
///
/// Each merchant's file holds that merchant's detail lines verbatim, in
/// input order, named `<merchant>_<KIND>.TXT`. The batch directory is
/// created even when there are no buckets (an empty but consistent file is
/// still a processed batch). Finally a `manifest.csv` is written with one
/// row per output file.
///
/// # Errors
///
/// - [`SplitError::BatchCollision`] when any target file already exists and
///   `overwrite` is false
/// - [`SplitError::Persistence`] for directory-creation or write failures
pub fn write_batch(
    output_root: &Path,
    id: &BatchId,
    kind: FileKind,
    buckets: &MerchantBuckets,
    overwrite: bool,
) -> Result<Batch, SplitError> {
    let dir = output_root.join(id.as_str());
    fs::create_dir_all(&dir).map_err(|e| SplitError::persistence("creating batch directory", &e))?;

    let targets: Vec<(String, PathBuf, usize)> = buckets
        .iter()
        .map(|(merchant, records)| {
            let file_name = format!("{}_{}.TXT", sanitize_file_name(merchant), kind);
            (merchant.to_string(), dir.join(file_name), records.len())
        })
        .collect();

    let manifest_path = dir.join(MANIFEST_NAME);
    if !overwrite {
        for path in targets
            .iter()
            .map(|(_, path, _)| path)
            .chain(std::iter::once(&manifest_path))
        {
            if path.exists() {
                return Err(SplitError::batch_collision(path.clone()));
            }
        }
    }

    // targets was built from buckets.iter(), so the two iterate in lockstep
    let mut entries = Vec::with_capacity(targets.len());
    for ((merchant, path, records), (_, bucket)) in targets.into_iter().zip(buckets.iter()) {
        write_merchant_file(&path, bucket.iter().map(|record| record.text.as_str()))?;
        info!("generated {} ({} records)", path.display(), records);
        entries.push(BatchEntry {
            merchant,
            path,
            records,
        });
    }

    write_manifest(&manifest_path, &entries)?;

    Ok(Batch {
        id: id.clone(),
        dir,
        entries,
        manifest: manifest_path,
    })
}

fn write_merchant_file<'a>(
    path: &Path,
    lines: impl Iterator<Item = &'a str>,
) -> Result<(), SplitError> {
    let mut file =
        fs::File::create(path).map_err(|e| SplitError::persistence("creating batch file", &e))?;
    for line in lines {
        writeln!(file, "{line}").map_err(|e| SplitError::persistence("writing batch file", &e))?;
    }
    file.flush()
        .map_err(|e| SplitError::persistence("flushing batch file", &e))
}

// Manifest schema: estabelecimento;arquivo;registros (semicolon-delimited,
// matching the per-batch report CSVs the review tooling already consumes).
fn write_manifest(path: &Path, entries: &[BatchEntry]) -> Result<(), SplitError> {
    let file = fs::File::create(path)
        .map_err(|e| SplitError::persistence("creating batch manifest", &e))?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);

    writer.write_record(["estabelecimento", "arquivo", "registros"])?;
    for entry in entries {
        let file_name = entry
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        writer.write_record(&[
            entry.merchant.clone(),
            file_name,
            entry.records.to_string(),
        ])?;
    }
    writer.flush().map_err(|e| SplitError::persistence("flushing batch manifest", &e))
}

/// Replace file-name-hostile characters in a merchant identifier
///
/// Merchant ids are normally nine digits, but the fallback bucket and any
/// malformed-but-accepted identifier must still produce a valid file name.
fn sanitize_file_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for ch in name.trim().chars() {
        let keep = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_');
        let next = if keep { ch } else { '_' };
        if next == '_' && last_was_underscore {
            continue;
        }
        last_was_underscore = next == '_';
        sanitized.push(next);
    }
    sanitized
}
