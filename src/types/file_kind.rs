//! Settlement file kinds and their record layouts
//!
//! Each acquirer extract kind (EEVC, EEVD, EEFI) carries the same overall
//! shape (one header, N detail records, one trailer) but addresses its
//! fields differently. This module pins those differences down in a small
//! per-kind [`RecordLayout`] table that is resolved once at the start of a
//! run, so no per-line branching on the kind is needed downstream.
//!
//! # File Kinds
//!
//! - **EEVC**: credit sales extract; fixed-width records typed by their
//!   first three columns (`002` header, `028` trailer)
//! - **EEVD**: debit sales extract; comma-delimited records typed by their
//!   first field (`00` header, `04` trailer)
//! - **EEFI**: financial extract; fixed-width records (`030` header, `052`
//!   trailer)
//!
//! # Kind Inference
//!
//! The kind can be supplied explicitly by the caller or inferred from the
//! file name convention `<TYPE>_<DDMMYY><seq>.TXT`. Inference is an explicit
//! parse step: an unrecognized name fails with [`SplitError::UnknownKind`]
//! rather than falling back to a guess.

use crate::types::SplitError;
use clap::ValueEnum;
use std::fmt;

/// Where a field lives inside a record line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAt {
    /// Half-open column span `[start, end)` of a fixed-width record
    Columns(usize, usize),

    /// Zero-based index into the delimited fields of a record
    Field(usize),
}

/// Record layout for one settlement file kind
///
/// Describes how to classify a line's role (header/trailer) and where the
/// merchant identifier and the trailer's declared record count live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Field delimiter, or `None` for fixed-width records
    pub delimiter: Option<char>,

    /// Record-type value that marks the header line
    pub header_type: &'static str,

    /// Record-type value that marks the trailer line
    pub trailer_type: &'static str,

    /// Width of the record-type column for fixed-width kinds
    pub type_width: usize,

    /// Location of the merchant identifier in a detail record
    pub merchant: FieldAt,

    /// Location of the declared record count in the trailer record
    pub declared_total: FieldAt,
}

impl RecordLayout {
    /// Extract the record-type value of a line
    ///
    /// For delimited kinds this is the first field; for fixed-width kinds
    /// the first `type_width` columns. Lines shorter than the type column
    /// yield themselves, which simply fails the header/trailer comparison.
    pub fn record_type<'a>(&self, line: &'a str) -> &'a str {
        match self.delimiter {
            Some(delimiter) => line.split(delimiter).next().unwrap_or("").trim(),
            None => line.get(..self.type_width).unwrap_or(line),
        }
    }

    /// Whether the line matches this kind's header pattern
    pub fn is_header(&self, line: &str) -> bool {
        self.record_type(line) == self.header_type
    }

    /// Whether the line matches this kind's trailer pattern
    pub fn is_trailer(&self, line: &str) -> bool {
        self.record_type(line) == self.trailer_type
    }

    /// Extract a raw field from a line, if present
    ///
    /// Returns `None` when the line is too short (fixed-width) or has too
    /// few fields (delimited) to contain the requested position.
    pub fn field<'a>(&self, line: &'a str, at: FieldAt) -> Option<&'a str> {
        match at {
            FieldAt::Columns(start, end) => line.get(start..end),
            FieldAt::Field(index) => self
                .delimiter
                .and_then(|delimiter| line.split(delimiter).nth(index)),
        }
    }

    /// Extract the merchant identifier field from a detail line, trimmed
    ///
    /// Returns `None` when the line cannot contain the field at all; an
    /// empty string when the field exists but is blank (the grouping policy
    /// decides what to do with that).
    pub fn merchant_field<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.field(line, self.merchant).map(str::trim)
    }

    /// Extract the declared record count from a trailer line
    ///
    /// Returns `None` when the field is absent or not numeric.
    pub fn trailer_total(&self, line: &str) -> Option<u64> {
        self.field(line, self.declared_total)
            .and_then(|raw| raw.trim().parse().ok())
    }
}

/// EEVC: fixed-width credit sales extract
const EEVC_LAYOUT: RecordLayout = RecordLayout {
    delimiter: None,
    header_type: "002",
    trailer_type: "028",
    type_width: 3,
    merchant: FieldAt::Columns(3, 12),
    declared_total: FieldAt::Columns(134, 149),
};

/// EEVD: comma-delimited debit sales extract
const EEVD_LAYOUT: RecordLayout = RecordLayout {
    delimiter: Some(','),
    header_type: "00",
    trailer_type: "04",
    type_width: 2,
    merchant: FieldAt::Field(1),
    declared_total: FieldAt::Field(10),
};

/// EEFI: fixed-width financial extract
const EEFI_LAYOUT: RecordLayout = RecordLayout {
    delimiter: None,
    header_type: "030",
    trailer_type: "052",
    type_width: 3,
    merchant: FieldAt::Columns(3, 12),
    declared_total: FieldAt::Columns(26, 41),
};

/// Settlement file kind
///
/// Determines the record layout used to classify lines and extract the
/// merchant identifier and trailer total. Must be resolved before any
/// detail line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FileKind {
    /// Credit sales extract (Extrato Eletrônico de Vendas Crédito)
    Eevc,

    /// Debit sales extract (Extrato Eletrônico de Vendas Débito)
    Eevd,

    /// Financial extract (Extrato Eletrônico Financeiro)
    Eefi,
}

impl FileKind {
    /// The record layout for this kind
    pub fn layout(&self) -> &'static RecordLayout {
        match self {
            FileKind::Eevc => &EEVC_LAYOUT,
            FileKind::Eevd => &EEVD_LAYOUT,
            FileKind::Eefi => &EEFI_LAYOUT,
        }
    }

    /// Canonical upper-case kind tag, as used in file names and the run log
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Eevc => "EEVC",
            FileKind::Eevd => "EEVD",
            FileKind::Eefi => "EEFI",
        }
    }

    /// Infer the kind from a file name
    ///
    /// Recognizes the kind tag anywhere in the upper-cased name, plus the
    /// short `_VC_` / `_VD_` / `_FI_` markers some upstream systems emit.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::UnknownKind`] when no marker is found. There is
    /// no default: the kind decides field offsets, so guessing would corrupt
    /// the split.
    pub fn from_file_name(file_name: &str) -> Result<Self, SplitError> {
        let upper = file_name.to_uppercase();
        if upper.contains("EEVC") || upper.contains("_VC_") {
            Ok(FileKind::Eevc)
        } else if upper.contains("EEVD") || upper.contains("_VD_") {
            Ok(FileKind::Eevd)
        } else if upper.contains("EEFI") || upper.contains("_FI_") {
            Ok(FileKind::Eefi)
        } else {
            Err(SplitError::unknown_kind(file_name))
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain_eevc("EEVC_051025.TXT", FileKind::Eevc)]
    #[case::plain_eevd("EEVD_051025.TXT", FileKind::Eevd)]
    #[case::plain_eefi("EEFI_041025.TXT", FileKind::Eefi)]
    #[case::lower_case("eevc_051025.txt", FileKind::Eevc)]
    #[case::short_marker_vc("REDE_VC_051025.TXT", FileKind::Eevc)]
    #[case::short_marker_vd("REDE_VD_051025.TXT", FileKind::Eevd)]
    #[case::short_marker_fi("REDE_FI_051025.TXT", FileKind::Eefi)]
    fn test_kind_inference(#[case] name: &str, #[case] expected: FileKind) {
        assert_eq!(FileKind::from_file_name(name).unwrap(), expected);
    }

    #[rstest]
    #[case::unrelated_name("SALES_051025.TXT")]
    #[case::empty_name("")]
    #[case::extension_only(".TXT")]
    fn test_kind_inference_fails(#[case] name: &str) {
        let err = FileKind::from_file_name(name).unwrap_err();
        assert!(matches!(err, SplitError::UnknownKind { .. }));
    }

    #[test]
    fn test_eevc_layout_classification() {
        let layout = FileKind::Eevc.layout();
        assert!(layout.is_header("002051020250000000000"));
        assert!(layout.is_trailer(&format!("028{}{:0>15}", " ".repeat(131), 62)));
        assert!(!layout.is_header("006123456789"));
        assert!(!layout.is_trailer("006123456789"));
    }

    #[test]
    fn test_eevc_merchant_and_total_extraction() {
        let layout = FileKind::Eevc.layout();
        let detail = format!("006{:0>9}SALEDATA", 12345);
        assert_eq!(layout.merchant_field(&detail), Some("000012345"));

        let trailer = format!("028{}{:0>15}", " ".repeat(131), 62);
        assert_eq!(layout.trailer_total(&trailer), Some(62));
    }

    #[test]
    fn test_eevd_layout_is_field_delimited() {
        let layout = FileKind::Eevd.layout();
        assert!(layout.is_header("00,900000000,05102025"));
        assert!(layout.is_trailer("04,900000000,0,0,0,0,0,0,0,0,62"));
        // "011" cancellation records must not be mistaken for headers
        assert!(!layout.is_header("011,123456789"));

        assert_eq!(layout.merchant_field("01, 123456789 ,data"), Some("123456789"));
        assert_eq!(
            layout.trailer_total("04,900000000,0,0,0,0,0,0,0,0,62"),
            Some(62)
        );
    }

    #[test]
    fn test_eefi_layout_extraction() {
        let layout = FileKind::Eefi.layout();
        assert!(layout.is_header("030051020250000"));
        let trailer = format!("052{}{:0>15}", " ".repeat(23), 57);
        assert!(layout.is_trailer(&trailer));
        assert_eq!(layout.trailer_total(&trailer), Some(57));

        let detail = format!("034{:0>9}credit", 777);
        assert_eq!(layout.merchant_field(&detail), Some("000000777"));
    }

    #[rstest]
    #[case::line_too_short("006")]
    #[case::empty_line("")]
    fn test_merchant_field_absent_on_short_lines(#[case] line: &str) {
        assert_eq!(FileKind::Eevc.layout().merchant_field(line), None);
    }

    #[test]
    fn test_declared_total_rejects_non_numeric() {
        let layout = FileKind::Eevc.layout();
        let trailer = format!("028{}{:>15}", " ".repeat(131), "ABC");
        assert_eq!(layout.trailer_total(&trailer), None);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(FileKind::Eevc.as_str(), "EEVC");
        assert_eq!(FileKind::Eevd.to_string(), "EEVD");
        assert_eq!(FileKind::Eefi.as_str(), "EEFI");
    }
}
