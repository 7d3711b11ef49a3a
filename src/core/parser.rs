// LogMerge - core/parser.rs
//
// Line-oriented log parsing.
// Core layer: works on text already read by the loader, never touches the
// filesystem directly.
//
// Line grammar: `<ISO-8601 timestamp><whitespace><free-text message>`.
// Blank lines are skipped silently; lines whose first token is not a
// timestamp are skipped with a warning. Neither is ever fatal.

use crate::core::model::{is_chronological, LogEntry, LogSequence, Timestamp};
use crate::util::error::ParseError;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::path::Path;

/// Configuration for parsing operations.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Malformed-line diagnostics kept per file (all are still logged).
    pub max_parse_errors_per_file: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_parse_errors_per_file: constants::MAX_PARSE_ERRORS_PER_FILE,
        }
    }
}

/// Result of parsing the content of a single log file.
#[derive(Debug)]
pub struct ParseResult {
    /// Parsed entries, in line order.
    pub entries: LogSequence,
    /// Malformed-line diagnostics (capped at max_parse_errors_per_file).
    pub errors: Vec<ParseError>,
    /// Total malformed lines, including those past the diagnostic cap.
    pub malformed_lines: usize,
    /// Total lines processed.
    pub lines_processed: u64,
}

impl ParseResult {
    /// Whether the entries came out in non-decreasing timestamp order.
    pub fn is_sorted(&self) -> bool {
        is_chronological(&self.entries)
    }
}

/// Parse one raw line.
///
/// Returns `Ok(None)` for a blank or whitespace-only line, `Ok(Some(entry))`
/// when the first whitespace-separated token is a timestamp, and
/// `Err(ParseError::MalformedLine)` otherwise. The message is the remaining
/// tokens joined by single spaces and may be empty.
pub fn parse_line(
    line: &str,
    file_path: &Path,
    line_number: u64,
) -> Result<Option<LogEntry>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };

    match parse_timestamp(first) {
        Ok(timestamp) => {
            let message = tokens.collect::<Vec<_>>().join(" ");
            Ok(Some(LogEntry::new(timestamp, message)))
        }
        Err(reason) => Err(ParseError::MalformedLine {
            file: file_path.to_path_buf(),
            line_number,
            raw_line: line.trim().to_string(),
            reason,
        }),
    }
}

/// Parse the full content of one log file.
///
/// Entries are returned in line order; no sorting is applied here.
/// Each malformed line produces a `warn` naming the file and the raw line.
pub fn parse_content(content: &str, file_path: &Path, config: &ParseConfig) -> ParseResult {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    let mut malformed_lines = 0usize;
    let mut lines_processed: u64 = 0;

    for (line_idx, line) in content.lines().enumerate() {
        lines_processed += 1;
        let line_number = (line_idx as u64) + 1;

        match parse_line(line, file_path, line_number) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(err) => {
                malformed_lines += 1;
                tracing::warn!(
                    file = %file_path.display(),
                    line_number,
                    line = %line.trim(),
                    "Skipping malformed line"
                );
                if errors.len() < config.max_parse_errors_per_file {
                    errors.push(err);
                }
            }
        }
    }

    tracing::debug!(
        file = %file_path.display(),
        entries = entries.len(),
        malformed = malformed_lines,
        lines = lines_processed,
        "Parsing complete"
    );

    ParseResult {
        entries,
        errors,
        malformed_lines,
        lines_processed,
    }
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Parse a single whitespace-free ISO-8601 token.
///
/// Accepted forms:
///   2025-07-09
///   2025-07-09T10:00
///   2025-07-09T10:00:00
///   2025-07-09T10:00:00.123456   (`,` also accepted as decimal mark)
/// each optionally followed by `Z`, `+HH`, `+HHMM` or `+HH:MM` (or `-`).
/// A date without a time means midnight.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, String> {
    if !raw.is_ascii() {
        return Err("timestamp contains non-ASCII characters".to_string());
    }
    if raw.len() < 10 || !is_date_shape(&raw[..10]) {
        return Err(format!("'{raw}' is not an ISO-8601 date"));
    }

    let date = NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d")
        .map_err(|e| format!("invalid date in '{raw}': {e}"))?;

    if raw.len() == 10 {
        return date
            .and_hms_opt(0, 0, 0)
            .map(Timestamp::Naive)
            .ok_or_else(|| format!("'{raw}' is out of range"));
    }

    let separator = raw.as_bytes()[10];
    if separator != b'T' && separator != b't' {
        return Err(format!("expected 'T' after the date in '{raw}'"));
    }

    let rest = &raw[11..];
    let (clock, offset) = match rest.find(['Z', 'z', '+', '-']) {
        Some(pos) => (&rest[..pos], Some(&rest[pos..])),
        None => (rest, None),
    };

    let time = parse_clock(clock).ok_or_else(|| format!("invalid time in '{raw}'"))?;
    let local = NaiveDateTime::new(date, time);

    match offset {
        None => Ok(Timestamp::Naive(local)),
        Some(offset) => {
            let offset =
                parse_offset(offset).ok_or_else(|| format!("invalid UTC offset in '{raw}'"))?;
            offset
                .from_local_datetime(&local)
                .single()
                .map(Timestamp::Zoned)
                .ok_or_else(|| format!("'{raw}' is out of range"))
        }
    }
}

/// `YYYY-MM-DD` with ASCII digits in every numeric position.
fn is_date_shape(s: &str) -> bool {
    s.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// `HH:MM` or `HH:MM:SS[.fraction]`.
fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let bytes = clock.as_bytes();
    if bytes.len() < 5 || bytes[2] != b':' {
        return None;
    }
    if bytes.len() == 5 {
        return NaiveTime::parse_from_str(clock, "%H:%M").ok();
    }
    if bytes.len() < 8 || bytes[5] != b':' {
        return None;
    }
    // Seconds must be exactly two digits, optionally followed by a fraction.
    if bytes.len() > 8 && bytes[8] != b'.' && bytes[8] != b',' {
        return None;
    }
    // chrono's %S admits a leap second; seconds stop at 59 here.
    if &bytes[6..8] == b"60" {
        return None;
    }
    let clock = clock.replace(',', ".");
    NaiveTime::parse_from_str(&clock, "%H:%M:%S%.f").ok()
}

/// `Z`, `±HH`, `±HHMM` or `±HH:MM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => (&digits[..2], &digits[2..]),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// =============================================================================
// Tests
// =============================================================================
