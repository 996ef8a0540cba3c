//! I/O module
//!
//! Persistent side effects of a run.
//!
//! # Components
//!
//! - `batch_writer` - per-merchant output files and the batch manifest
//! - `run_log` - the append-only operations log
//! - `router` - source-file relocation after a run

pub mod batch_writer;
pub mod router;
pub mod run_log;

pub use batch_writer::{write_batch, Batch, BatchEntry};
pub use router::{move_into, route};
pub use run_log::{LogRow, RunLog, LOG_COLUMNS};
