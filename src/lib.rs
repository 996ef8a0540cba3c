//! Settlement Splitter Library
//! # Overview
//!
//! This library splits fixed-structure payment-network settlement files
//! (EEVC, EEVD, EEFI) into per-merchant output files and validates that the
//! number of detail records processed equals the total declared by the
//! file's trailer.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (FileKind, RawLine, MerchantBuckets,
//!   RunOutcome, SplitError)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::parser`] - record-boundary parsing and role classification
//!   - [`core::grouping`] - merchant bucketing with stable ordering
//!   - [`core::reconciler`] - trailer count reconciliation
//!   - [`core::engine`] - the run pipeline and its configuration
//! - [`io`] - Persistent side effects:
//!   - [`io::batch_writer`] - per-merchant output files and the manifest
//!   - [`io::run_log`] - the append-only operations log
//!   - [`io::router`] - source-file archiving and error routing
//!
//! # Run Lifecycle
//!
//! Each input file moves through one linear pipeline:
//!
//! ```text
//! RECEIVED -> PARSED -> GROUPED -> RECONCILED -> WRITTEN -> ROUTED -> LOGGED
//! ```
//!
//! A run ends `LOGGED` (with verdict `OK` or `ERRO`) or fails outright; no
//! stage retries internally. Distinct files may be processed concurrently:
//! outputs partition by batch identifier and the run log serializes its own
//! appends.
//!
//! # External Collaborators
//!
//! The HTTP upload/status/download surfaces, the daily scheduler, the
//! divergence mailer and the directory-watching agent all live outside this
//! crate. They interact with the engine through an input path, the output
//! directory tree, the run-log schema and the returned [`types::RunOutcome`].

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{MissingMerchantPolicy, SplitterConfig, SplitterEngine};
pub use crate::io::{Batch, LogRow, RunLog};
pub use crate::types::{
    BatchId, DetailRecord, FileKind, MerchantBuckets, RawLine, RunOutcome, SplitError, Trailer,
    Verdict,
};
