//! Splitter engine
//!
//! This module provides the SplitterEngine that orchestrates one complete
//! file-processing run by coordinating the parser, grouping engine, trailer
//! reconciler, batch writer, file router and run logger.
//!
//! # Pipeline
//!
//! Each file moves through a fixed state sequence:
//!
//! ```text
//! RECEIVED -> PARSED -> GROUPED -> RECONCILED -> WRITTEN -> ROUTED -> LOGGED
//! ```
//!
//! Any stage can fail the run; no stage is retried (retry is the external
//! scheduler's decision, made on a later invocation). A divergent verdict is
//! NOT a failure: the outputs are still written for manual inspection, the
//! source file routes to the error directory and the row logs `ERRO`.
//!
//! # Failure Side Effects
//!
//! - Malformed files and unrecognizable detail lines invalidate the input:
//!   the source file is moved to the error directory and the attempt is
//!   logged before the error propagates.
//! - An unknown file kind is logged (kind `DESCONHECIDO`) but produces no
//!   other side effect.
//! - Batch collisions and persistence failures leave the source file where
//!   it was; collisions are logged so the dashboard shows the blocked
//!   attempt.
//! - A failed move is never followed by a log row claiming the run was
//!   routed: the routing error propagates instead.
//!
//! # Concurrency
//!
//! Runs for distinct input files may execute concurrently: outputs are
//! partitioned by batch identifier and the run log serializes its appends
//! internally. Same-batch re-entry surfaces as a collision by design.

use crate::core::grouping::{self, MissingMerchantPolicy};
use crate::core::parser;
use crate::core::reconciler;
use crate::io::batch_writer;
use crate::io::run_log::{LogRow, RunLog, UNKNOWN_KIND_TAG};
use crate::io::router;
use crate::types::{BatchId, FileKind, RunOutcome, SplitError, Verdict};
use chrono::Local;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration: directory layout and split policies
///
/// Directories mirror the deployment layout the external collaborators
/// (upload handler, dashboard, download endpoints) expect.
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Root of the per-batch output tree
    pub output_root: PathBuf,

    /// Where consistently processed source files are archived
    pub archive_dir: PathBuf,

    /// Where divergent or malformed source files land for manual review
    pub error_dir: PathBuf,

    /// Path of the append-only operations log
    pub log_path: PathBuf,

    /// Allow rewriting an existing batch instead of failing on collision
    pub overwrite: bool,

    /// Handling of detail lines with an empty merchant identifier
    pub missing_merchant: MissingMerchantPolicy,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        SplitterConfig {
            output_root: PathBuf::from("output"),
            archive_dir: PathBuf::from("processados"),
            error_dir: PathBuf::from("erro"),
            log_path: PathBuf::from("logs/operacoes.csv"),
            overwrite: false,
            missing_merchant: MissingMerchantPolicy::default(),
        }
    }
}

impl SplitterConfig {
    /// Create the directory skeleton the engine writes into
    ///
    /// # Errors
    ///
    /// [`SplitError::Configuration`] when a required directory cannot be
    /// created; the engine refuses to start a run it could not finish.
    pub fn ensure_dirs(&self) -> Result<(), SplitError> {
        let mut required = vec![
            self.output_root.as_path(),
            self.archive_dir.as_path(),
            self.error_dir.as_path(),
        ];
        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                required.push(parent);
            }
        }
        for dir in required {
            fs::create_dir_all(dir).map_err(|e| {
                SplitError::configuration(format!(
                    "required directory '{}' could not be created: {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(())
    }
}

/// File-processing engine
///
/// Owns the configuration and the run log; one engine instance can process
/// any number of files, sequentially or from concurrent threads.
#[derive(Debug)]
pub struct SplitterEngine {
    config: SplitterConfig,
    run_log: RunLog,
}

impl SplitterEngine {
    /// Create an engine from a configuration
    pub fn new(config: SplitterConfig) -> Self {
        let run_log = RunLog::new(config.log_path.clone());
        SplitterEngine { config, run_log }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Process one settlement file to completion or failure
    ///
    /// The kind is inferred from the file name when not supplied; the batch
    /// identifier is derived from the file name.
    ///
    /// # Returns
    ///
    /// The immutable [`RunOutcome`], whether the verdict was OK or
    /// divergent. Callers key notification on the verdict.
    ///
    /// # Errors
    ///
    /// Any [`SplitError`]; see the module docs for which failures leave
    /// which side effects behind.
    pub fn process_file(
        &self,
        input: &Path,
        kind: Option<FileKind>,
    ) -> Result<RunOutcome, SplitError> {
        self.process_with(input, kind, None)
    }

    /// Process one settlement file under an explicit batch identifier
    pub fn process_with(
        &self,
        input: &Path,
        kind: Option<FileKind>,
        batch_id: Option<BatchId>,
    ) -> Result<RunOutcome, SplitError> {
        let file_name = match input.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                return Err(SplitError::configuration(format!(
                    "input path '{}' has no file name",
                    input.display()
                )))
            }
        };

        let kind = match kind {
            Some(kind) => kind,
            None => match FileKind::from_file_name(&file_name) {
                Ok(kind) => kind,
                Err(err) => {
                    error!("{file_name}: {err}");
                    self.run_log
                        .append(&LogRow::failure(&file_name, UNKNOWN_KIND_TAG, &err.to_string()))?;
                    return Err(err);
                }
            },
        };

        let batch_id = batch_id.unwrap_or_else(|| BatchId::derive(&file_name));
        info!("processing {file_name} as {kind} (batch {batch_id})");

        match self.split(input, &file_name, kind, &batch_id) {
            Ok(outcome) => {
                router::route(
                    input,
                    outcome.verdict,
                    &self.config.archive_dir,
                    &self.config.error_dir,
                )?;
                self.run_log.append(&LogRow::from_outcome(&outcome))?;
                match outcome.verdict {
                    Verdict::Ok => info!("{}", outcome.summary()),
                    Verdict::Divergent => warn!("{}", outcome.summary()),
                }
                Ok(outcome)
            }
            Err(err) => {
                error!("{file_name}: {err}");
                if err.invalidates_input() {
                    // The file itself is bad: park it for manual review,
                    // then record the attempt.
                    router::move_into(input, &self.config.error_dir)?;
                }
                self.run_log
                    .append(&LogRow::failure(&file_name, kind.as_str(), &err.to_string()))?;
                Err(err)
            }
        }
    }

    /// The fallible split stages: parse, group, reconcile, write
    fn split(
        &self,
        input: &Path,
        file_name: &str,
        kind: FileKind,
        batch_id: &BatchId,
    ) -> Result<RunOutcome, SplitError> {
        let bytes =
            fs::read(input).map_err(|e| SplitError::persistence("reading the input file", &e))?;
        let parsed = parser::parse_bytes(&bytes, kind)?;
        if parsed.blank_lines > 0 {
            info!("{file_name}: skipped {} blank lines", parsed.blank_lines);
        }

        let buckets =
            grouping::group_details(&parsed.details, kind, self.config.missing_merchant)?;
        let reconciliation = reconciler::reconcile(&parsed.trailer, &buckets);

        // Outputs are written even on divergence so operators can inspect
        // exactly what was grouped.
        batch_writer::write_batch(
            &self.config.output_root,
            batch_id,
            kind,
            &buckets,
            self.config.overwrite,
        )?;

        Ok(RunOutcome {
            file_name: file_name.to_string(),
            kind,
            trailer_total: parsed.trailer.declared_total,
            processed_total: reconciliation.processed_total,
            verdict: reconciliation.verdict,
            detail: reconciliation.detail,
            timestamp: Local::now(),
            batch_id: batch_id.clone(),
        })
    }
}
