//! Core split-and-validate logic
//!
//! This module contains the engine components, leaves first:
//! - `parser` - classifies raw lines as header / detail / trailer
//! - `grouping` - buckets detail records by merchant identifier
//! - `reconciler` - compares the trailer total with the processed total
//! - `engine` - drives one run through the full pipeline

pub mod engine;
pub mod grouping;
pub mod parser;
pub mod reconciler;

pub use engine::{SplitterConfig, SplitterEngine};
pub use grouping::{group_details, MissingMerchantPolicy, FALLBACK_MERCHANT};
pub use parser::{parse_bytes, parse_records, ParsedFile};
pub use reconciler::{reconcile, Reconciliation};
