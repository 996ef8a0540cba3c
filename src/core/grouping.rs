//! Grouping engine
//!
//! Buckets parsed detail lines by merchant identifier in a single linear
//! pass, preserving first-seen merchant order and input order within each
//! bucket. A detail line that cannot yield a merchant identifier aborts the
//! run: skipping it would silently corrupt the processed total that the
//! trailer reconciliation depends on.

use crate::types::{DetailRecord, FileKind, MerchantBuckets, RawLine, SplitError};

/// Bucket used for details whose merchant field is blank when the fallback
/// policy is active (the dashboard's catch-all bucket).
pub const FALLBACK_MERCHANT: &str = "NSA_000";

/// What to do with a detail line whose merchant field is empty or whitespace
///
/// The upstream layout is ambiguous here, so the choice is an explicit
/// configuration rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingMerchantPolicy {
    /// Fail the run with an UnrecognizedDetail error
    #[default]
    Reject,

    /// Attribute the record to the [`FALLBACK_MERCHANT`] bucket
    Fallback,
}

/// Group detail lines into per-merchant buckets
///
/// # Arguments
///
/// * `details` - classified detail lines in input order
/// * `kind` - the file kind whose layout locates the merchant field
/// * `policy` - handling of blank merchant fields
///
/// # Errors
///
/// [`SplitError::UnrecognizedDetail`] (with the offending 1-based line
/// number) when a line is too short or has too few fields to carry a
/// merchant identifier, or when the field is blank under the `Reject`
/// policy.
pub fn group_details(
    details: &[RawLine],
    kind: FileKind,
    policy: MissingMerchantPolicy,
) -> Result<MerchantBuckets, SplitError> {
    let layout = kind.layout();
    let mut buckets = MerchantBuckets::new();

    for line in details {
        let merchant = match layout.merchant_field(&line.text) {
            Some(field) if !field.is_empty() => field.to_string(),
            Some(_) => match policy {
                MissingMerchantPolicy::Fallback => FALLBACK_MERCHANT.to_string(),
                MissingMerchantPolicy::Reject => {
                    return Err(SplitError::unrecognized_detail(
                        line.number,
                        "detail record has an empty merchant identifier",
                    ))
                }
            },
            None => {
                return Err(SplitError::unrecognized_detail(
                    line.number,
                    "detail record is too short to carry a merchant identifier",
                ))
            }
        };

        buckets.push(DetailRecord {
            merchant,
            text: line.text.clone(),
            line_number: line.number,
        });
    }

    Ok(buckets)
}
