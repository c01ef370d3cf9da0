// LogTally - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Access record (normalised output of parsing)
// =============================================================================

/// A single parsed access log request.
///
/// This is the core data unit that flows through aggregation and export.
/// Created from exactly one raw line by the line parser; immutable once
/// created. Every field except `date` is the verbatim capture from the
/// source line: no trimming, no case changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    /// Client address (IP or hostname) that issued the request.
    pub client_addr: String,

    /// Raw timestamp text between the square brackets, unparsed.
    pub timestamp_raw: String,

    /// HTTP method from the request line (GET, POST, ...).
    pub method: String,

    /// Requested path from the request line.
    pub path: String,

    /// Three-digit HTTP status code, kept as text for verbatim export.
    pub status: String,

    /// Calendar date derived from `timestamp_raw`. `None` when the
    /// timestamp did not parse; such records are excluded from the daily
    /// aggregate but participate in all others.
    pub date: Option<NaiveDate>,
}

// =============================================================================
// Parse outcome
// =============================================================================

/// Outcome of parsing one raw line.
///
/// A line either matches the access log pattern in full (all required
/// captures non-empty) or it does not; there is no partial record. The
/// unmatched case is a variant, not an empty-field sentinel, so it cannot
/// leak into the dataset through a loose validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The line matched and produced a valid record.
    Matched(AccessRecord),

    /// The line did not match the pattern (or a required capture was empty).
    Unmatched,
}

impl ParsedLine {
    /// Returns the record for matched lines, `None` otherwise.
    pub fn into_record(self) -> Option<AccessRecord> {
        match self {
            Self::Matched(record) => Some(record),
            Self::Unmatched => None,
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// One row of a grouped count over a string-keyed dimension
/// (status code, path, method, client address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    /// Group key, verbatim from the records.
    pub key: String,

    /// Number of records in the group.
    pub count: u64,
}

/// One row of the daily request volume aggregate. The key stays a typed
/// date so ascending order is calendar order, not string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    /// Calendar date of the requests.
    pub date: NaiveDate,

    /// Number of dated records on that day.
    pub count: u64,
}

// =============================================================================
// Run summary
// =============================================================================

/// Summary statistics for a completed pipeline run.
///
/// Printed to stdout at the end of the run and optionally exported as JSON
/// via --summary-json.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Input file the run processed.
    pub input_path: PathBuf,

    /// Total raw lines read, including unmatched ones.
    pub total_lines: u64,

    /// Lines that parsed into a valid record.
    pub parsed_records: u64,

    /// Lines dropped as unmatched.
    pub unmatched_lines: u64,

    /// Parsed records with a derived calendar date.
    pub dated_records: u64,

    /// Parsed records whose timestamp did not parse.
    pub undated_records: u64,

    /// Earliest date seen across dated records.
    pub earliest_date: Option<NaiveDate>,

    /// Latest date seen across dated records.
    pub latest_date: Option<NaiveDate>,

    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,

    /// Final paths of all export artifacts written, in write order.
    pub exports: Vec<PathBuf>,
}
