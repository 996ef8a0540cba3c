//! Error types for the settlement splitter
//!
//! All failure modes of a processing run are represented by [`SplitError`].
//! The taxonomy follows the pipeline's failure-handling contract:
//!
//! - **Configuration errors** (unknown file kind, un-creatable directories)
//!   are fatal and produce no split side effects.
//! - **Malformed-file errors** (empty file, bad encoding, missing header or
//!   trailer) invalidate the input file: it is routed to the error directory
//!   and the attempt is logged.
//! - **Unrecognized-detail errors** invalidate the input the same way; a
//!   single unattributable detail line would make the processed total wrong,
//!   so it aborts the run instead of being skipped.
//! - **Batch collisions** signal same-batch re-entry and require operator
//!   intervention (or an explicit overwrite).
//! - **Persistence errors** are I/O failures during write/move/log; retry
//!   policy belongs to the external caller, never to the core.
//!
//! Reconciliation divergence is NOT an error: it is the expected
//! [`Verdict::Divergent`](crate::types::Verdict) path, handled inside the
//! pipeline.

use crate::types::FileKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the settlement splitter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// File kind could not be inferred from the file name
    #[error("unrecognized file kind for '{file_name}' (expected EEVC, EEVD or EEFI)")]
    UnknownKind {
        /// The file name that matched no kind marker
        file_name: String,
    },

    /// Invalid or incomplete engine configuration
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// Input file contains no non-blank lines
    #[error("file is empty")]
    EmptyFile,

    /// Input bytes are not valid UTF-8
    #[error("file is not valid UTF-8")]
    InvalidEncoding,

    /// First non-blank line does not match the kind's header pattern
    #[error("first line is not a {kind} header record")]
    MissingHeader {
        /// Kind whose header pattern was expected
        kind: FileKind,
    },

    /// Last non-blank line does not match the kind's trailer pattern
    #[error("no {kind} trailer record found")]
    MissingTrailer {
        /// Kind whose trailer pattern was expected
        kind: FileKind,
    },

    /// Trailer found, but its declared record count is unreadable
    #[error("trailer declared total '{raw}' is not numeric")]
    UnreadableTrailerTotal {
        /// The raw field content
        raw: String,
    },

    /// A detail line did not yield a merchant identifier
    #[error("line {line}: {reason}")]
    UnrecognizedDetail {
        /// 1-based line number in the source file
        line: usize,
        /// Why the merchant identifier could not be extracted
        reason: String,
    },

    /// Output for this batch identifier already exists
    #[error("batch output already exists at '{path}' (pass an overwrite policy or a fresh batch id)")]
    BatchCollision {
        /// The colliding output path
        path: PathBuf,
    },

    /// I/O failure while writing outputs, moving files or appending the log
    #[error("I/O failure while {operation}: {message}")]
    Persistence {
        /// Operation that failed
        operation: String,
        /// Description of the underlying I/O error
        message: String,
    },
}

impl SplitError {
    /// Whether this failure invalidates the input file itself
    ///
    /// Invalidating failures route the source file to the error directory
    /// and log the attempt; other failures leave the source file in place.
    pub fn invalidates_input(&self) -> bool {
        matches!(
            self,
            SplitError::EmptyFile
                | SplitError::InvalidEncoding
                | SplitError::MissingHeader { .. }
                | SplitError::MissingTrailer { .. }
                | SplitError::UnreadableTrailerTotal { .. }
                | SplitError::UnrecognizedDetail { .. }
        )
    }

    /// Create an UnknownKind error
    pub fn unknown_kind(file_name: &str) -> Self {
        SplitError::UnknownKind {
            file_name: file_name.to_string(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        SplitError::Configuration {
            message: message.into(),
        }
    }

    /// Create an UnrecognizedDetail error
    pub fn unrecognized_detail(line: usize, reason: impl Into<String>) -> Self {
        SplitError::UnrecognizedDetail {
            line,
            reason: reason.into(),
        }
    }

    /// Create a BatchCollision error
    pub fn batch_collision(path: impl Into<PathBuf>) -> Self {
        SplitError::BatchCollision { path: path.into() }
    }

    /// Create a Persistence error from an operation and its I/O cause
    pub fn persistence(operation: &str, error: &std::io::Error) -> Self {
        SplitError::Persistence {
            operation: operation.to_string(),
            message: error.to_string(),
        }
    }
}

// Conversion from io::Error for contexts without a better operation label
impl From<std::io::Error> for SplitError {
    fn from(error: std::io::Error) -> Self {
        SplitError::Persistence {
            operation: "accessing the filesystem".to_string(),
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error (run log and manifest writing)
impl From<csv::Error> for SplitError {
    fn from(error: csv::Error) -> Self {
        SplitError::Persistence {
            operation: "writing CSV output".to_string(),
            message: error.to_string(),
        }
    }
}
