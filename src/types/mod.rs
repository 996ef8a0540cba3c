//! Types module
//!
//! Core data structures used throughout the splitter:
//! - `file_kind`: settlement file kinds and their record layouts
//! - `record`: raw lines, detail records, trailers and merchant buckets
//! - `outcome`: verdicts, batch identifiers and run outcomes
//! - `error`: the error taxonomy

pub mod error;
pub mod file_kind;
pub mod outcome;
pub mod record;

pub use error::SplitError;
pub use file_kind::{FieldAt, FileKind, RecordLayout};
pub use outcome::{BatchId, RunOutcome, Verdict};
pub use record::{DetailRecord, LineRole, MerchantBuckets, RawLine, Trailer};
