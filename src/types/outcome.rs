//! Run outcome types
//!
//! A [`RunOutcome`] is created exactly once per processed file and never
//! mutated afterward. It carries everything the run log, the file router and
//! the external notifier need, so a divergence alert can be assembled
//! without re-reading the log.

use crate::types::FileKind;
use chrono::{DateTime, Local};
use std::fmt;

/// Verdict of the trailer reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Processed detail count equals the trailer's declared count
    Ok,

    /// Counts differ; the source file needs manual review
    Divergent,
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }

    /// Status string used in the run log (`status` column contract)
    pub fn as_status(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Divergent => "ERRO",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_status())
    }
}

/// Batch identifier partitioning the output tree
///
/// Derived from the input file name (`EEVC_051025.TXT` → `EEVC_051025`) or
/// supplied explicitly by the caller. The identifier is caller-visible: the
/// download/list surfaces group output files by it, and same-batch re-entry
/// is detected through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchId(String);

impl BatchId {
    pub fn new(id: impl Into<String>) -> Self {
        BatchId(id.into())
    }

    /// Derive the batch identifier from an input file name
    ///
    /// Takes the upper-cased file stem, so the date/sequence portion of the
    /// `<TYPE>_<DDMMYY><seq>.TXT` convention (and the type tag, keeping
    /// same-day batches of different kinds disjoint) ends up in the id.
    pub fn derive(file_name: &str) -> Self {
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file_name,
        };
        BatchId(stem.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one file-processing run
///
/// Persisted by the run logger and consumed by the file router and the
/// external notifier.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Base name of the processed file
    pub file_name: String,

    /// Resolved settlement file kind
    pub kind: FileKind,

    /// Record count the trailer declared
    pub trailer_total: u64,

    /// Detail records actually grouped across all merchant buckets
    pub processed_total: u64,

    /// Reconciliation verdict
    pub verdict: Verdict,

    /// Human-readable reconciliation detail
    pub detail: String,

    /// Local time the run completed
    pub timestamp: DateTime<Local>,

    /// Batch identifier the outputs were written under
    pub batch_id: BatchId,
}

impl RunOutcome {
    /// One-line summary for the invoking scheduler/operator
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} — {}",
            self.file_name,
            self.kind,
            self.verdict.as_status(),
            self.detail
        )
    }
}
