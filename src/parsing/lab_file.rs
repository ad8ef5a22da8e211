//! Parser for GSGT-style lab report files.
//!
//! A lab report is a text file with a `[Header]` section of key/value lines
//! followed by a `[Data]` section holding a tab-delimited SNP table. Only a
//! preview is extracted: the header map, the table's column names and the
//! first data row. Scanning stops as soon as that row has been read.
//!
//! ```text
//! [Header]
//! GSGT Version	2.0.4
//! Processing Date	7/31/2025 12:56 PM
//! Gender    Female
//! Num SNPs	671521
//! [Data]
//! Sample ID	SNP Name	Chr	Position	Allele1 - Forward	Allele2 - Forward
//! DSC042739	1:103380393	1	103380393	G	G
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::report::{HeaderMap, LabReport};
use crate::parsing::text::decode_prefix;

/// Number of leading bytes inspected by [`is_lab_file_format`]
pub const DETECT_PREFIX_BYTES: usize = 2048;

/// Number of leading bytes considered by [`parse_lab_file`]
pub const MAX_PARSE_BYTES: usize = 100 * 1024;

const HEADER_MARKER: &str = "[Header]";
const DATA_MARKER: &str = "[Data]";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Header line of the form `Key<2+ whitespace>Value`
static SPACED_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s{2,}(.*)$").expect("valid header pair pattern"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabFileError {
    #[error("File does not look like a recognized lab report.")]
    NotRecognized,
}

/// Section of the file the scanner is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Header,
    Data,
}

/// Check whether a buffer looks like a lab report.
///
/// Only the first [`DETECT_PREFIX_BYTES`] bytes are inspected; both the
/// `[Header]` and `[Data]` markers must appear there, in any order.
#[must_use]
pub fn is_lab_file_format(bytes: &[u8]) -> bool {
    let prefix = decode_prefix(bytes, DETECT_PREFIX_BYTES);
    prefix.contains(HEADER_MARKER) && prefix.contains(DATA_MARKER)
}

/// Parse the first [`MAX_PARSE_BYTES`] bytes of a lab report.
///
/// This never fails: malformed header lines are skipped and invalid UTF-8 is
/// replaced. Callers that need to reject unrelated files should use
/// [`inspect_lab_file`], or check [`is_lab_file_format`] first.
#[must_use]
pub fn parse_lab_file(bytes: &[u8]) -> LabReport {
    let text = decode_prefix(bytes, MAX_PARSE_BYTES);
    parse_lab_text(&text)
}

/// Detect and parse a lab report in one step.
///
/// # Errors
///
/// Returns `LabFileError::NotRecognized` if the buffer does not carry both
/// section markers within its first [`DETECT_PREFIX_BYTES`] bytes.
pub fn inspect_lab_file(bytes: &[u8]) -> Result<LabReport, LabFileError> {
    if !is_lab_file_format(bytes) {
        debug!("Section markers not found in first {DETECT_PREFIX_BYTES} bytes");
        return Err(LabFileError::NotRecognized);
    }
    Ok(parse_lab_file(bytes))
}

/// Parse already-decoded lab report text
#[must_use]
pub fn parse_lab_text(text: &str) -> LabReport {
    let mut section = Section::None;
    let mut header = HeaderMap::new();
    let mut data_columns = Vec::new();
    let mut seen_column_row = false;
    let mut first_row: Option<Vec<String>> = None;

    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    // `lines` splits on '\n' and drops a trailing '\r'
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed == HEADER_MARKER {
            debug!("[Header] section starts on line {}", i + 1);
            section = Section::Header;
            continue;
        }
        if trimmed == DATA_MARKER {
            debug!("[Data] section starts on line {}", i + 1);
            section = Section::Data;
            seen_column_row = false;
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        match section {
            Section::None => {}
            Section::Header => match split_header_line(trimmed) {
                Some((key, value)) => {
                    header.insert(key.to_string(), value.to_string());
                }
                None => trace!("Skipping header line {}: {trimmed:?}", i + 1),
            },
            Section::Data => {
                if seen_column_row {
                    first_row = Some(split_row(line));
                    debug!("First data row read on line {}, stopping", i + 1);
                    break;
                }
                data_columns = split_row(line);
                seen_column_row = true;
            }
        }
    }

    LabReport::from_sections(header, data_columns, first_row.as_deref())
}

/// Split a trimmed header line into a key/value pair.
///
/// A tab separates key from value; without a tab, a run of two or more
/// whitespace characters after the first token does. Lines matching neither,
/// or yielding an empty key, give `None`.
fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = if let Some((key, value)) = line.split_once('\t') {
        (key.trim(), value.trim())
    } else {
        let captures = SPACED_PAIR.captures(line)?;
        let key = captures.get(1)?.as_str();
        let value = captures.get(2).map_or("", |m| m.as_str().trim());
        (key, value)
    };

    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

/// Split a table row on tabs, trimming each cell
fn split_row(line: &str) -> Vec<String> {
    line.split('\t').map(|cell| cell.trim().to_string()).collect()
}
