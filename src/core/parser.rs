// LogTally - core/parser.rs
//
// Line-oriented access log parsing.
// Core layer: accepts string content, never touches the filesystem.

use crate::core::model::{AccessRecord, ParsedLine};
use crate::util::constants;
use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use regex::Regex;
use std::sync::OnceLock;

/// Apache-style access log line pattern. Five capture groups, assigned
/// positionally: client address, timestamp, method, path, status code.
const LINE_PATTERN: &str = r#"^(\S+) - - \[(.*?)\] "(.*?) (.*?) HTTP.*" (\d{3})$"#;

fn line_regex() -> &'static Regex {
    static LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the unit tests
    // below, so a mistake shows up as a failing test rather than a
    // runtime panic.
    LINE_REGEX.get_or_init(|| Regex::new(LINE_PATTERN).expect("line pattern: invalid regex"))
}

/// Result of parsing a full input file.
#[derive(Debug)]
pub struct ParseOutput {
    /// Valid records, in input order.
    pub records: Vec<AccessRecord>,

    /// Lines that did not produce a record.
    pub unmatched_lines: u64,

    /// Total lines processed, matched or not.
    pub total_lines: u64,
}

/// Parse a single raw line.
///
/// Pure per-line function: a line either matches the pattern with all
/// required captures non-empty and becomes a record, or it is `Unmatched`.
/// The timestamp capture may be empty or malformed; that only costs the
/// record its derived date, not its validity.
pub fn parse_line(line: &str) -> ParsedLine {
    let Some(caps) = line_regex().captures(line) else {
        return ParsedLine::Unmatched;
    };

    let client_addr = &caps[1];
    let timestamp_raw = &caps[2];
    let method = &caps[3];
    let path = &caps[4];
    let status = &caps[5];

    // Validity predicate: all four non-timestamp fields must be non-empty.
    // The lazy request-line captures can legally match empty strings (e.g.
    // a request line with a missing method), and such rows must not reach
    // the dataset.
    if client_addr.is_empty() || method.is_empty() || path.is_empty() || status.is_empty() {
        return ParsedLine::Unmatched;
    }

    ParsedLine::Matched(AccessRecord {
        client_addr: client_addr.to_string(),
        timestamp_raw: timestamp_raw.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        status: status.to_string(),
        date: parse_date(timestamp_raw),
    })
}

/// Derive the calendar date from a raw timestamp capture.
///
/// The parse must consume the entire string, so a timestamp carrying a
/// timezone offset (`10/Oct/2023:13:55:36 +0000`) fails and the record
/// stays undated. Time of day is discarded.
pub fn parse_date(timestamp_raw: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(timestamp_raw, constants::TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| ndt.date())
}

/// Parse full file content into records.
///
/// Lines are parsed in parallel across data partitions; the collected
/// record order follows input order. Unmatched lines (including empty
/// ones) are counted, never surfaced as errors.
pub fn parse_content(content: &str) -> ParseOutput {
    let parsed: Vec<ParsedLine> = content.par_lines().map(parse_line).collect();

    let total_lines = parsed.len() as u64;
    let mut records = Vec::with_capacity(parsed.len());
    let mut unmatched_lines = 0u64;

    for line in parsed {
        match line.into_record() {
            Some(record) => records.push(record),
            None => unmatched_lines += 1,
        }
    }

    tracing::debug!(
        total = total_lines,
        parsed = records.len(),
        unmatched = unmatched_lines,
        "Parsing complete"
    );

    ParseOutput {
        records,
        unmatched_lines,
        total_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> AccessRecord {
        match parse_line(line) {
            ParsedLine::Matched(r) => r,
            ParsedLine::Unmatched => panic!("expected a match for: {line:?}"),
        }
    }

    #[test]
    fn test_parse_well_formed_line() {
        let r = record(r#"127.0.0.1 - - [10/Oct/2023:13:55:36] "GET /index.html HTTP/1.1" 200"#);
        assert_eq!(r.client_addr, "127.0.0.1");
        assert_eq!(r.timestamp_raw, "10/Oct/2023:13:55:36");
        assert_eq!(r.method, "GET");
        assert_eq!(r.path, "/index.html");
        assert_eq!(r.status, "200");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2023, 10, 10));
    }

    /// Captures are verbatim: no trimming, no case normalisation.
    #[test]
    fn test_fields_are_verbatim() {
        let r = record(r#"host-1 - - [01/Jan/2024:00:00:01] "get /A%20B?q=1 HTTP/1.0" 404"#);
        assert_eq!(r.method, "get");
        assert_eq!(r.path, "/A%20B?q=1");
    }

    #[test]
    fn test_non_matching_line_is_unmatched() {
        assert_eq!(parse_line("not a log line"), ParsedLine::Unmatched);
        assert_eq!(parse_line(""), ParsedLine::Unmatched);
    }

    /// A request line with a missing method matches the lazy pattern with an
    /// empty third group; the validity predicate must reject it.
    #[test]
    fn test_empty_method_capture_is_unmatched() {
        let line = r#"1.2.3.4 - - [10/Oct/2023:13:55:36] " /index.html HTTP/1.1" 200"#;
        assert_eq!(parse_line(line), ParsedLine::Unmatched);
    }

    /// Status code must be exactly three digits at end of line.
    #[test]
    fn test_trailing_junk_after_status_is_unmatched() {
        let line = r#"1.2.3.4 - - [10/Oct/2023:13:55:36] "GET / HTTP/1.1" 2000"#;
        assert_eq!(parse_line(line), ParsedLine::Unmatched);
    }

    #[test]
    fn test_timezone_suffix_leaves_record_undated() {
        let r = record(r#"10.0.0.9 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 500"#);
        assert_eq!(r.timestamp_raw, "10/Oct/2023:13:55:36 +0000");
        assert_eq!(r.date, None);
    }

    #[test]
    fn test_parse_date_strict_format() {
        assert_eq!(
            parse_date("10/Oct/2023:13:55:36"),
            NaiveDate::from_ymd_opt(2023, 10, 10)
        );
        assert_eq!(parse_date("10/10/2023:13:55:36"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_content_counts() {
        let content = "127.0.0.1 - - [10/Oct/2023:13:55:36] \"GET /a HTTP/1.1\" 200\n\
                       garbage\n\
                       \n\
                       127.0.0.2 - - [11/Oct/2023:08:15:00] \"POST /b HTTP/1.1\" 404\n";
        let out = parse_content(content);
        assert_eq!(out.total_lines, 4);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.unmatched_lines, 2);
        // Input order is preserved through the parallel parse.
        assert_eq!(out.records[0].path, "/a");
        assert_eq!(out.records[1].path, "/b");
    }
}
