//! Trailer reconciliation
//!
//! Compares the trailer's declared record count with the number of detail
//! records actually grouped. The comparison is exact integer equality; there
//! is no tolerance window. The resulting detail text is what operators see
//! in the run log and in divergence alerts, so it states the absolute
//! difference and its direction (missing vs. extra records).

use crate::types::{MerchantBuckets, Trailer, Verdict};

/// Result of reconciling a trailer against the grouped detail records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Detail records counted across all merchant buckets
    pub processed_total: u64,

    /// OK iff processed equals declared
    pub verdict: Verdict,

    /// Operator-facing detail text
    pub detail: String,
}

/// Reconcile the declared trailer total with the grouped record count
pub fn reconcile(trailer: &Trailer, buckets: &MerchantBuckets) -> Reconciliation {
    let declared = trailer.declared_total;
    let processed = buckets.total_records();

    if processed == declared {
        return Reconciliation {
            processed_total: processed,
            verdict: Verdict::Ok,
            detail: format!("Contagem consistente: {processed} registros"),
        };
    }

    let detail = if processed < declared {
        let missing = declared - processed;
        format!("{missing} {} faltando", noun(missing))
    } else {
        let extra = processed - declared;
        if extra == 1 {
            "1 registro extra".to_string()
        } else {
            format!("{extra} registros extras")
        }
    };

    Reconciliation {
        processed_total: processed,
        verdict: Verdict::Divergent,
        detail,
    }
}

fn noun(count: u64) -> &'static str {
    if count == 1 {
        "registro"
    } else {
        "registros"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DetailRecord, LineRole, RawLine};
    use rstest::rstest;

    fn trailer(declared_total: u64) -> Trailer {
        Trailer {
            declared_total,
            line: RawLine::new("028", 99, LineRole::Trailer),
        }
    }

    fn buckets_with(count: usize) -> MerchantBuckets {
        let mut buckets = MerchantBuckets::new();
        for i in 0..count {
            buckets.push(DetailRecord {
                merchant: format!("{:0>9}", i % 3),
                text: format!("detail {i}"),
                line_number: i + 2,
            });
        }
        buckets
    }

    #[rstest]
    #[case::regular(62, 62)]
    #[case::single(1, 1)]
    #[case::empty_file(0, 0)]
    fn test_equal_counts_are_consistent(#[case] declared: u64, #[case] processed: usize) {
        let result = reconcile(&trailer(declared), &buckets_with(processed));
        assert_eq!(result.verdict, Verdict::Ok);
        assert_eq!(result.processed_total, declared);
        assert_eq!(
            result.detail,
            format!("Contagem consistente: {declared} registros")
        );
    }

    #[rstest]
    #[case::two_missing(59, 57, "2 registros faltando")]
    #[case::one_missing(58, 57, "1 registro faltando")]
    #[case::all_missing(5, 0, "5 registros faltando")]
    #[case::one_extra(57, 58, "1 registro extra")]
    #[case::many_extra(0, 3, "3 registros extras")]
    fn test_divergent_counts_report_difference(
        #[case] declared: u64,
        #[case] processed: usize,
        #[case] expected_detail: &str,
    ) {
        let result = reconcile(&trailer(declared), &buckets_with(processed));
        assert_eq!(result.verdict, Verdict::Divergent);
        assert_eq!(result.processed_total, processed as u64);
        assert_eq!(result.detail, expected_detail);
    }
}
