//! Record parser for settlement files
//!
//! Turns raw file bytes into a typed sequence of classified lines. The
//! parser only decides each line's role; field semantics (merchant ids,
//! declared totals) stay with the [`FileKind`] layout accessors.
//!
//! # Classification Rules
//!
//! Role classification is positional per kind:
//! - the first non-blank line must match the kind's header pattern
//! - the trailer is the last non-blank line and must match the trailer
//!   pattern (exactly one trailer per file; absence is an error, never a
//!   silent zero)
//! - every line strictly between header and trailer is a detail record
//!
//! Blank lines are skipped but counted, so diagnostics can account for every
//! line of the source file. No line is ever silently dropped: anything that
//! is not a header, trailer or blank line reaches the grouping stage as a
//! detail record.

use crate::types::{FileKind, LineRole, RawLine, SplitError, Trailer};

/// A settlement file split into classified records
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Kind the file was parsed as
    pub kind: FileKind,

    /// The header line
    pub header: RawLine,

    /// Detail lines in input order
    pub details: Vec<RawLine>,

    /// The trailer and its declared record count
    pub trailer: Trailer,

    /// Number of blank lines skipped during classification
    pub blank_lines: usize,
}

/// Parse raw file bytes into classified records
///
/// Checks the encoding before classification: settlement extracts are
/// ASCII/UTF-8, and anything else is rejected as malformed rather than
/// being silently re-encoded.
///
/// # Errors
///
/// [`SplitError::InvalidEncoding`] for non-UTF-8 input, plus everything
/// [`parse_records`] returns.
pub fn parse_bytes(bytes: &[u8], kind: FileKind) -> Result<ParsedFile, SplitError> {
    let text = std::str::from_utf8(bytes).map_err(|_| SplitError::InvalidEncoding)?;
    parse_records(text, kind)
}

/// Parse file text into classified records
///
/// # Errors
///
/// - [`SplitError::EmptyFile`] when no non-blank line exists
/// - [`SplitError::MissingHeader`] when the first non-blank line does not
///   match the kind's header pattern
/// - [`SplitError::MissingTrailer`] when the last non-blank line does not
///   match the trailer pattern, or the file holds a header and nothing else
/// - [`SplitError::UnreadableTrailerTotal`] when the trailer matches but
///   its declared count field is not numeric
pub fn parse_records(text: &str, kind: FileKind) -> Result<ParsedFile, SplitError> {
    let layout = kind.layout();

    let mut lines: Vec<RawLine> = Vec::new();
    let mut blank_lines = 0;
    for (index, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            blank_lines += 1;
            continue;
        }
        lines.push(RawLine::new(raw, index + 1, LineRole::Unknown));
    }

    if lines.is_empty() {
        return Err(SplitError::EmptyFile);
    }

    let mut header = lines.remove(0);
    if !layout.is_header(&header.text) {
        return Err(SplitError::MissingHeader { kind });
    }
    header.role = LineRole::Header;

    // The trailer is the last non-blank line; a file that ends in anything
    // else (including a file with only a header) has no trailer.
    let mut trailer_line = match lines.pop() {
        Some(line) if layout.is_trailer(&line.text) => line,
        _ => return Err(SplitError::MissingTrailer { kind }),
    };
    trailer_line.role = LineRole::Trailer;

    let declared_total = match layout.trailer_total(&trailer_line.text) {
        Some(total) => total,
        None => {
            let raw = layout
                .field(&trailer_line.text, layout.declared_total)
                .unwrap_or("")
                .trim()
                .to_string();
            return Err(SplitError::UnreadableTrailerTotal { raw });
        }
    };

    let details = lines
        .into_iter()
        .map(|mut line| {
            line.role = LineRole::Detail;
            line
        })
        .collect();

    Ok(ParsedFile {
        kind,
        header,
        details,
        trailer: Trailer {
            declared_total,
            line: trailer_line,
        },
        blank_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn eevc_header() -> String {
        format!("002{:0<30}", "05102025")
    }

    fn eevc_detail(merchant: &str) -> String {
        format!("006{:0>9}{:X<20}", merchant, "")
    }

    fn eevc_trailer(total: u64) -> String {
        format!("028{}{:0>15}", " ".repeat(131), total)
    }

    fn eevc_file(details: &[&str], total: u64) -> String {
        let mut lines = vec![eevc_header()];
        lines.extend(details.iter().map(|m| eevc_detail(m)));
        lines.push(eevc_trailer(total));
        lines.join("\n") + "\n"
    }

    #[test]
    fn test_parses_well_formed_eevc_file() {
        let text = eevc_file(&["111", "222", "111"], 3);
        let parsed = parse_records(&text, FileKind::Eevc).unwrap();

        assert_eq!(parsed.kind, FileKind::Eevc);
        assert_eq!(parsed.header.role, LineRole::Header);
        assert_eq!(parsed.header.number, 1);
        assert_eq!(parsed.details.len(), 3);
        assert!(parsed.details.iter().all(|d| d.role == LineRole::Detail));
        assert_eq!(parsed.trailer.declared_total, 3);
        assert_eq!(parsed.trailer.line.role, LineRole::Trailer);
        assert_eq!(parsed.blank_lines, 0);
    }

    #[test]
    fn test_parses_delimited_eevd_file() {
        let text = "00,900000000,05102025\n\
                    01,123456789,sale\n\
                    01,987654321,sale\n\
                    04,900000000,0,0,0,0,0,0,0,0,2\n";
        let parsed = parse_records(text, FileKind::Eevd).unwrap();

        assert_eq!(parsed.details.len(), 2);
        assert_eq!(parsed.trailer.declared_total, 2);
    }

    #[test]
    fn test_blank_lines_are_skipped_and_counted() {
        let text = format!(
            "{}\n\n{}\n   \n{}\n\n",
            eevc_header(),
            eevc_detail("111"),
            eevc_trailer(1)
        );
        let parsed = parse_records(&text, FileKind::Eevc).unwrap();

        assert_eq!(parsed.details.len(), 1);
        assert_eq!(parsed.blank_lines, 3);
        // Line numbers still count blank lines
        assert_eq!(parsed.details[0].number, 3);
        assert_eq!(parsed.trailer.line.number, 5);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank_only("\n   \n\n")]
    fn test_empty_file_is_rejected(#[case] text: &str) {
        let err = parse_records(text, FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::EmptyFile);
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let text = format!("{}\n{}\n", eevc_detail("111"), eevc_trailer(1));
        let err = parse_records(&text, FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::MissingHeader { kind: FileKind::Eevc });
    }

    #[test]
    fn test_missing_trailer_is_rejected() {
        let text = format!("{}\n{}\n", eevc_header(), eevc_detail("111"));
        let err = parse_records(&text, FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::MissingTrailer { kind: FileKind::Eevc });
    }

    #[test]
    fn test_header_only_file_has_no_trailer() {
        let text = eevc_header() + "\n";
        let err = parse_records(&text, FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::MissingTrailer { kind: FileKind::Eevc });
    }

    #[test]
    fn test_records_after_trailer_are_rejected() {
        let text = format!(
            "{}\n{}\n{}\n",
            eevc_header(),
            eevc_trailer(0),
            eevc_detail("111")
        );
        let err = parse_records(&text, FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::MissingTrailer { kind: FileKind::Eevc });
    }

    #[test]
    fn test_non_numeric_trailer_total_is_rejected() {
        let text = format!(
            "{}\n{}\n028{}{:>15}\n",
            eevc_header(),
            eevc_detail("111"),
            " ".repeat(131),
            "ABC"
        );
        let err = parse_records(&text, FileKind::Eevc).unwrap_err();
        assert_eq!(
            err,
            SplitError::UnreadableTrailerTotal { raw: "ABC".to_string() }
        );
    }

    #[test]
    fn test_zero_detail_file_parses() {
        let text = format!("{}\n{}\n", eevc_header(), eevc_trailer(0));
        let parsed = parse_records(&text, FileKind::Eevc).unwrap();
        assert!(parsed.details.is_empty());
        assert_eq!(parsed.trailer.declared_total, 0);
    }

    #[test]
    fn test_detail_text_is_kept_verbatim() {
        let detail = eevc_detail("555");
        let text = format!("{}\n{}\n{}\n", eevc_header(), detail, eevc_trailer(1));
        let parsed = parse_records(&text, FileKind::Eevc).unwrap();
        assert_eq!(parsed.details[0].text, detail);
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = parse_bytes(&[0x30, 0x30, 0xFF, 0xFE], FileKind::Eevc).unwrap_err();
        assert_eq!(err, SplitError::InvalidEncoding);
    }

    #[test]
    fn test_parse_bytes_delegates_to_text_parsing() {
        let text = eevc_file(&["111"], 1);
        let parsed = parse_bytes(text.as_bytes(), FileKind::Eevc).unwrap();
        assert_eq!(parsed.details.len(), 1);
    }
}
