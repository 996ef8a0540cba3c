//! Append-only run log
//!
//! One row is appended per attempted run, success or failure, so the log is
//! a complete record of everything the engine was asked to process. The
//! external status and dashboard surfaces read this file directly, which
//! makes its schema a compatibility contract:
//!
//! ```text
//! data_hora, arquivo, tipo, total_trailer, total_processado, status, detalhe
//! ```
//!
//! Column order and names are fixed; `status` is `OK` or `ERRO`.
//!
//! # Concurrency
//!
//! The log is the only resource shared between concurrent runs. Appends
//! serialize behind a mutex, and each append opens, writes and flushes the
//! file while holding the guard, so rows never interleave mid-write.

use crate::types::{RunOutcome, SplitError};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log schema, in contract order
pub const LOG_COLUMNS: [&str; 7] = [
    "data_hora",
    "arquivo",
    "tipo",
    "total_trailer",
    "total_processado",
    "status",
    "detalhe",
];

/// Timestamp format of the `data_hora` column
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Kind tag logged when the file kind could not be resolved
pub const UNKNOWN_KIND_TAG: &str = "DESCONHECIDO";

/// One row of the run log
///
/// Field order mirrors [`LOG_COLUMNS`]; serde serialization relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    pub data_hora: String,
    pub arquivo: String,
    pub tipo: String,
    pub total_trailer: u64,
    pub total_processado: u64,
    pub status: String,
    pub detalhe: String,
}

impl LogRow {
    /// Row for a completed run (verdict OK or divergent)
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        LogRow {
            data_hora: outcome.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            arquivo: outcome.file_name.clone(),
            tipo: outcome.kind.as_str().to_string(),
            total_trailer: outcome.trailer_total,
            total_processado: outcome.processed_total,
            status: outcome.verdict.as_status().to_string(),
            detalhe: outcome.detail.clone(),
        }
    }

    /// Row for a run that failed before producing an outcome
    ///
    /// Totals are zero and the detail carries the failure description, so
    /// the dashboard still shows the attempt.
    pub fn failure(file_name: &str, kind_tag: &str, detail: &str) -> Self {
        LogRow {
            data_hora: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            arquivo: file_name.to_string(),
            tipo: kind_tag.to_string(),
            total_trailer: 0,
            total_processado: 0,
            status: "ERRO".to_string(),
            detalhe: detail.to_string(),
        }
    }
}

/// Durable, append-only operations log with serialized appends
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RunLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, creating the file (and its header) on first use
    ///
    /// # Errors
    ///
    /// [`SplitError::Persistence`] when the file cannot be opened, written
    /// or flushed, or when the append mutex was poisoned by a panicking run.
    pub fn append(&self, row: &LogRow) -> Result<(), SplitError> {
        let _guard = self.lock.lock().map_err(|_| SplitError::Persistence {
            operation: "appending to the run log".to_string(),
            message: "run log mutex poisoned".to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SplitError::persistence("creating the log directory", &e))?;
            }
        }

        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SplitError::persistence("opening the run log", &e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(LOG_COLUMNS)?;
        }
        writer.serialize(row)?;
        writer
            .flush()
            .map_err(|e| SplitError::persistence("flushing the run log", &e))
    }

    /// Last `n` data rows, most recent last, as raw CSV lines
    ///
    /// This is what the external status endpoint shows; the header row is
    /// not included. A missing log file simply yields no rows.
    pub fn tail(&self, n: usize) -> Result<Vec<String>, SplitError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SplitError::persistence("reading the run log", &e)),
        };

        let rows: Vec<String> = content.lines().skip(1).map(str::to_string).collect();
        let start = rows.len().saturating_sub(n);
        Ok(rows[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchId, FileKind, Verdict};
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn sample_row(file_name: &str) -> LogRow {
        LogRow {
            data_hora: "05/10/2025 03:00:00".to_string(),
            arquivo: file_name.to_string(),
            tipo: "EEVC".to_string(),
            total_trailer: 62,
            total_processado: 62,
            status: "OK".to_string(),
            detalhe: "Contagem consistente: 62 registros".to_string(),
        }
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("operacoes.csv"));

        log.append(&sample_row("EEVC_051025.TXT")).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "data_hora,arquivo,tipo,total_trailer,total_processado,status,detalhe"
        );
        assert_eq!(
            lines[1],
            "05/10/2025 03:00:00,EEVC_051025.TXT,EEVC,62,62,OK,Contagem consistente: 62 registros"
        );
    }

    #[test]
    fn test_header_is_written_only_once() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("operacoes.csv"));

        log.append(&sample_row("A.TXT")).unwrap();
        log.append(&sample_row("B.TXT")).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.matches("data_hora").count(), 1);
    }

    #[test]
    fn test_log_directory_is_created_on_demand() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("logs/nested/operacoes.csv"));
        log.append(&sample_row("A.TXT")).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_row_from_outcome_follows_schema() {
        let outcome = RunOutcome {
            file_name: "EEFI_041025.TXT".to_string(),
            kind: FileKind::Eefi,
            trailer_total: 59,
            processed_total: 57,
            verdict: Verdict::Divergent,
            detail: "2 registros faltando".to_string(),
            timestamp: Local::now(),
            batch_id: BatchId::new("EEFI_041025"),
        };
        let row = LogRow::from_outcome(&outcome);

        assert_eq!(row.arquivo, "EEFI_041025.TXT");
        assert_eq!(row.tipo, "EEFI");
        assert_eq!(row.total_trailer, 59);
        assert_eq!(row.total_processado, 57);
        assert_eq!(row.status, "ERRO");
        assert_eq!(row.detalhe, "2 registros faltando");
    }

    #[test]
    fn test_failure_row_carries_unknown_kind_tag() {
        let row = LogRow::failure("MYSTERY.TXT", UNKNOWN_KIND_TAG, "unrecognized file kind");
        assert_eq!(row.tipo, "DESCONHECIDO");
        assert_eq!(row.status, "ERRO");
        assert_eq!(row.total_trailer, 0);
        assert_eq!(row.total_processado, 0);
    }

    #[test]
    fn test_tail_returns_most_recent_rows() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("operacoes.csv"));
        for i in 0..5 {
            log.append(&sample_row(&format!("FILE_{i}.TXT"))).unwrap();
        }

        let tail = log.tail(2).unwrap();
        assert_eq!(tail.len(), 2);
        assert!(tail[0].contains("FILE_3.TXT"));
        assert!(tail[1].contains("FILE_4.TXT"));
    }

    #[test]
    fn test_tail_of_missing_log_is_empty() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("missing.csv"));
        assert!(log.tail(10).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempdir().unwrap();
        let log = Arc::new(RunLog::new(dir.path().join("operacoes.csv")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for j in 0..10 {
                        log.append(&sample_row(&format!("FILE_{i}_{j}.TXT"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 81); // header + 80 rows
        for row in &lines[1..] {
            assert_eq!(row.split(',').count(), 7, "malformed row: {row}");
        }
    }
}
