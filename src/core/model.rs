// LogMerge - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary between parsing, merging and
// writing. Only the timestamp and the message of a line survive into the
// merged output; no per-server identity is carried.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Timestamp
// =============================================================================

/// A point in time parsed from an ISO-8601 token.
///
/// Log lines may carry either a naive local time (`2025-07-09T10:00:00`) or a
/// time with an explicit offset (`2025-07-09T10:00:00+02:00`). Both are kept
/// as written so the merged output reproduces them faithfully.
///
/// Ordering and equality compare the UTC instant. Naive timestamps are
/// treated as UTC for that purpose, which gives a total order over mixed
/// inputs instead of refusing to compare them.
#[derive(Debug, Clone, Copy)]
pub enum Timestamp {
    /// No offset was present in the source token.
    Naive(NaiveDateTime),

    /// An explicit offset (`Z`, `+HH:MM`, ...) was present.
    Zoned(DateTime<FixedOffset>),
}

impl Timestamp {
    /// The UTC instant used for ordering.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(ndt) => *ndt,
            Timestamp::Zoned(dt) => dt.naive_utc(),
        }
    }

    /// The wall-clock reading as written in the source line.
    fn local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(ndt) => *ndt,
            Timestamp::Zoned(dt) => dt.naive_local(),
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(ndt: NaiveDateTime) -> Self {
        Timestamp::Naive(ndt)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp::Zoned(dt)
    }
}

/// Canonical ISO-8601 rendering: `YYYY-MM-DDTHH:MM:SS`, then `.ffffff` only
/// when there is a sub-second part (nine digits if it is finer than a
/// microsecond), then `+HH:MM` for zoned values.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.local();
        write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S"))?;

        let nanos = local.nanosecond() % 1_000_000_000;
        if nanos != 0 {
            if nanos % 1_000 == 0 {
                write!(f, ".{:06}", nanos / 1_000)?;
            } else {
                write!(f, ".{nanos:09}")?;
            }
        }

        if let Timestamp::Zoned(dt) = self {
            let secs = dt.offset().local_minus_utc();
            let sign = if secs < 0 { '-' } else { '+' };
            let secs = secs.unsigned_abs();
            write!(f, "{sign}{:02}:{:02}", secs / 3600, (secs % 3600) / 60)?;
        }
        Ok(())
    }
}

// =============================================================================
// Log Entry
// =============================================================================

/// A single parsed log line.
///
/// Immutable once constructed: the fields are private and only readable
/// through accessors, so nothing downstream of the parser can alter an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: Timestamp,
    message: String,
}

impl LogEntry {
    pub fn new(timestamp: Timestamp, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Free text following the timestamp, words rejoined with single spaces.
    /// Empty when the line held only a timestamp.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Entries from one source (in file line order) or the result of merging.
pub type LogSequence = Vec<LogEntry>;

/// True if every entry's timestamp is `<=` its successor's.
pub fn is_chronological(entries: &[LogEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
}

// =============================================================================
// Merge Summary
// =============================================================================

/// Summary statistics for a completed merge run.
#[derive(Debug, Clone, Default)]
pub struct MergeSummary {
    /// Number of `.log` files that contributed a sequence.
    pub files_merged: usize,

    /// Entries written to the output file.
    pub total_entries: usize,

    /// Malformed lines skipped across all files.
    pub malformed_lines: usize,

    /// Files whose entries were not in chronological order on disk.
    pub unsorted_files: Vec<PathBuf>,

    /// Rounds of pairwise merging performed by the scheduler.
    pub merge_rounds: usize,

    /// Full path of the written output file.
    pub output_path: PathBuf,

    /// Per-file breakdown, in enumeration order.
    pub file_summaries: Vec<FileSummary>,

    /// Wall-clock run duration.
    pub duration: Duration,
}

/// Per-file load statistics.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub path: PathBuf,

    /// Entries parsed from this file.
    pub entry_count: usize,

    /// Malformed lines skipped in this file.
    pub malformed_count: usize,

    /// Whether the file was already chronological when read.
    pub chronological: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn naive(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_naive_display_has_no_fraction_when_whole_second() {
        let ts = Timestamp::from(naive(10, 0, 0));
        assert_eq!(ts.to_string(), "2025-07-09T10:00:00");
    }

    #[test]
    fn test_display_microseconds() {
        let ndt = NaiveDate::from_ymd_opt(2025, 7, 9)
            .unwrap()
            .and_hms_micro_opt(10, 0, 0, 123_000)
            .unwrap();
        assert_eq!(Timestamp::from(ndt).to_string(), "2025-07-09T10:00:00.123000");
    }

    #[test]
    fn test_zoned_display_keeps_local_time_and_offset() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let dt = offset.from_local_datetime(&naive(10, 0, 0)).single().unwrap();
        assert_eq!(
            Timestamp::from(dt).to_string(),
            "2025-07-09T10:00:00+05:30"
        );

        let west = FixedOffset::west_opt(3600).unwrap();
        let dt = west.from_local_datetime(&naive(10, 0, 0)).single().unwrap();
        assert_eq!(Timestamp::from(dt).to_string(), "2025-07-09T10:00:00-01:00");
    }

    #[test]
    fn test_ordering_compares_utc_instant() {
        // 10:00+02:00 is 08:00 UTC, which is before naive 09:00.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let zoned = Timestamp::from(
            plus_two
                .from_local_datetime(&naive(10, 0, 0))
                .single()
                .unwrap(),
        );
        let later = Timestamp::from(naive(9, 0, 0));
        assert!(zoned < later);

        let same = Timestamp::from(naive(8, 0, 0));
        assert_eq!(zoned, same);
    }

    #[test]
    fn test_is_chronological() {
        let a = LogEntry::new(naive(10, 0, 0).into(), "a");
        let b = LogEntry::new(naive(10, 0, 0).into(), "b");
        let c = LogEntry::new(naive(11, 0, 0).into(), "c");
        assert!(is_chronological(&[]));
        assert!(is_chronological(&[a.clone(), b.clone(), c.clone()]));
        assert!(!is_chronological(&[c, a]));
    }
}
