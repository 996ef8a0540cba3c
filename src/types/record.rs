//! Line-level record types for settlement files
//!
//! A settlement file is processed as a sequence of classified lines: one
//! header, N detail records, one trailer. The original line text is kept
//! verbatim end to end: output files must reproduce input bytes, so no
//! record is ever re-formatted after classification.

use std::collections::HashMap;

/// Role of one line within a settlement file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// First line of the file, matching the kind's header pattern
    Header,

    /// A transaction/settlement record between header and trailer
    Detail,

    /// Last non-blank line, declaring the total record count
    Trailer,

    /// Not yet classified
    Unknown,
}

/// One raw line of the source file
///
/// Immutable once classified: the text is the exact input line (without the
/// line terminator) and the number is 1-based within the source file,
/// counting blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Verbatim line text
    pub text: String,

    /// 1-based line number in the source file
    pub number: usize,

    /// Inferred role
    pub role: LineRole,
}

impl RawLine {
    pub fn new(text: impl Into<String>, number: usize, role: LineRole) -> Self {
        RawLine {
            text: text.into(),
            number,
            role,
        }
    }
}

/// A parsed detail record, attributed to a merchant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    /// Merchant identifier (PV) extracted per the file kind's layout
    pub merchant: String,

    /// Verbatim line text, written unchanged to the merchant's output file
    pub text: String,

    /// 1-based line number in the source file
    pub line_number: usize,
}

/// The file trailer and its declared record count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    /// Total number of detail records the file claims to contain
    pub declared_total: u64,

    /// The raw trailer line
    pub line: RawLine,
}

/// Detail records bucketed by merchant identifier
///
/// Bucket iteration follows first-seen merchant order and records within a
/// bucket keep input order. Both orderings are part of the output contract:
/// re-running a file must produce byte-identical per-merchant files.
#[derive(Debug, Default, Clone)]
pub struct MerchantBuckets {
    order: Vec<String>,
    buckets: HashMap<String, Vec<DetailRecord>>,
}

impl MerchantBuckets {
    pub fn new() -> Self {
        MerchantBuckets::default()
    }

    /// Append a record to its merchant's bucket, creating the bucket on
    /// first occurrence
    pub fn push(&mut self, record: DetailRecord) {
        match self.buckets.get_mut(&record.merchant) {
            Some(bucket) => bucket.push(record),
            None => {
                self.order.push(record.merchant.clone());
                self.buckets.insert(record.merchant.clone(), vec![record]);
            }
        }
    }

    /// Number of distinct merchants
    pub fn merchant_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of detail records across all buckets
    pub fn total_records(&self) -> u64 {
        self.buckets.values().map(|bucket| bucket.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records for one merchant, in input order
    pub fn get(&self, merchant: &str) -> Option<&[DetailRecord]> {
        self.buckets.get(merchant).map(Vec::as_slice)
    }

    /// Iterate buckets in first-seen merchant order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DetailRecord])> {
        self.order
            .iter()
            .map(|merchant| (merchant.as_str(), self.buckets[merchant].as_slice()))
    }
}
