// LogTally - tests/e2e_pipeline.rs
//
// End-to-end tests for the full pipeline.
//
// These tests exercise the real filesystem, real regex parsing, real
// chrono date derivation, and the real shard-publish export path: no
// mocks, no stubs. The fixture covers well-formed lines across three
// days, a malformed line, a timezone-suffixed timestamp (valid record,
// no date), and a request line with a missing method.

use logtally::app::config::AppConfig;
use logtally::app::pipeline;
use logtally::util::error::LogTallyError;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_config(output_dir: &Path) -> AppConfig {
    AppConfig {
        input_path: fixture("access_sample.log"),
        output_dir: output_dir.to_path_buf(),
        ..AppConfig::default()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read '{}': {e}", path.display()))
        .lines()
        .map(String::from)
        .collect()
}

// =============================================================================
// Pipeline E2E
// =============================================================================

/// A full run over the fixture produces the expected summary counts.
#[test]
fn e2e_run_summary_counts() {
    let out = tempfile::tempdir().unwrap();
    let summary = pipeline::run(&fixture_config(out.path()), None).unwrap();

    assert_eq!(summary.total_lines, 9);
    assert_eq!(summary.parsed_records, 7, "malformed + empty-method dropped");
    assert_eq!(summary.unmatched_lines, 2);
    assert_eq!(summary.dated_records, 6, "timezone-suffixed line is undated");
    assert_eq!(summary.undated_records, 1);
    assert_eq!(
        summary.earliest_date.map(|d| d.to_string()).as_deref(),
        Some("2023-10-10")
    );
    assert_eq!(
        summary.latest_date.map(|d| d.to_string()).as_deref(),
        Some("2023-10-12")
    );
}

/// All three CSV artifacts exist and nothing else is left in the output
/// directory (shard directories are discarded after publish).
#[test]
fn e2e_exports_are_single_files() {
    let out = tempfile::tempdir().unwrap();
    let summary = pipeline::run(&fixture_config(out.path()), None).unwrap();

    assert_eq!(summary.exports.len(), 3);
    for path in &summary.exports {
        assert!(path.exists(), "missing export: {}", path.display());
    }

    let mut entries: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(
        entries,
        vec![
            "codes_distribution.csv".to_string(),
            "logs_parsed.csv".to_string(),
            "logs_parsed_utf8.csv".to_string(),
        ]
    );
}

/// Status aggregate export: count-descending with key-ascending ties, and
/// the counts sum to the parsed record count.
#[test]
fn e2e_codes_distribution_content() {
    let out = tempfile::tempdir().unwrap();
    pipeline::run(&fixture_config(out.path()), None).unwrap();

    let lines = read_lines(&out.path().join("codes_distribution.csv"));
    assert_eq!(
        lines,
        vec!["Code,count", "200,4", "401,1", "404,1", "500,1"]
    );

    let total: u64 = lines[1..]
        .iter()
        .map(|l| l.rsplit(',').next().unwrap().parse::<u64>().unwrap())
        .sum();
    assert_eq!(total, 7);
}

/// The dataset export carries one row per valid record in input order;
/// unmatched input lines never appear.
#[test]
fn e2e_logs_parsed_content() {
    let out = tempfile::tempdir().unwrap();
    pipeline::run(&fixture_config(out.path()), None).unwrap();

    let lines = read_lines(&out.path().join("logs_parsed.csv"));
    assert_eq!(lines[0], "IP,Timestamp,Method,Page,Code,Date");
    assert_eq!(lines.len(), 8, "header + 7 records");

    assert_eq!(
        lines[1],
        "192.168.1.10,10/Oct/2023:13:55:36,GET,/index.html,200,2023-10-10"
    );
    // The timezone-suffixed record keeps its raw timestamp but has no date.
    assert_eq!(
        lines[5],
        "172.16.0.3,11/Oct/2023:09:20:44 +0000,GET,/missing.html,404,"
    );

    for dropped in ["not a log line", "/broken"] {
        assert!(
            !lines.iter().any(|l| l.contains(dropped)),
            "unmatched line leaked into export: {dropped}"
        );
    }
}

/// The UTF-8 export equals the main dataset export modulo the header row
/// (the fixture is clean ASCII, so sanitisation is a no-op).
#[test]
fn e2e_utf8_export_matches_dataset() {
    let out = tempfile::tempdir().unwrap();
    pipeline::run(&fixture_config(out.path()), None).unwrap();

    let plain = read_lines(&out.path().join("logs_parsed.csv"));
    let utf8 = read_lines(&out.path().join("logs_parsed_utf8.csv"));
    assert_eq!(utf8[0], "ip,timestamp,method,page,code,log_date");
    assert_eq!(utf8[1..], plain[1..]);
}

/// Running the pipeline twice on identical input produces byte-identical
/// CSV artifacts (idempotent overwrite).
#[test]
fn e2e_reruns_are_byte_identical() {
    let out = tempfile::tempdir().unwrap();
    let config = fixture_config(out.path());

    pipeline::run(&config, None).unwrap();
    let codes_first = fs::read(out.path().join("codes_distribution.csv")).unwrap();
    let logs_first = fs::read(out.path().join("logs_parsed.csv")).unwrap();

    pipeline::run(&config, None).unwrap();
    assert_eq!(
        codes_first,
        fs::read(out.path().join("codes_distribution.csv")).unwrap()
    );
    assert_eq!(
        logs_first,
        fs::read(out.path().join("logs_parsed.csv")).unwrap()
    );
}

/// --summary-json adds a fourth artifact with the run totals.
#[test]
fn e2e_summary_json_export() {
    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("summary.json");
    let summary = pipeline::run(&fixture_config(out.path()), Some(&json_path)).unwrap();

    assert_eq!(summary.exports.len(), 4);
    let text = fs::read_to_string(&json_path).unwrap();
    assert!(text.contains("\"parsed_records\": 7"));
    assert!(text.contains("\"unmatched_lines\": 2"));
}

/// A missing input file is fatal and reported as an input error.
#[test]
fn e2e_missing_input_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let config = AppConfig {
        input_path: out.path().join("does-not-exist.log"),
        output_dir: out.path().to_path_buf(),
        ..AppConfig::default()
    };

    let result = pipeline::run(&config, None);
    assert!(matches!(result, Err(LogTallyError::Input { .. })));
}

/// Input bytes that are not valid UTF-8 survive the run: the record stays
/// in the dataset export (with U+FFFD) and the relational export drops the
/// offending character instead of failing.
#[test]
fn e2e_invalid_utf8_input_is_sanitised() {
    let out = tempfile::tempdir().unwrap();
    let input = out.path().join("latin1.log");
    let mut bytes =
        b"10.0.0.1 - - [10/Oct/2023:13:55:36] \"GET /caf\xE9 HTTP/1.1\" 200\n".to_vec();
    bytes.extend_from_slice(b"garbage\n");
    fs::write(&input, bytes).unwrap();

    let config = AppConfig {
        input_path: input,
        output_dir: out.path().join("exports"),
        ..AppConfig::default()
    };
    let summary = pipeline::run(&config, None).unwrap();
    assert_eq!(summary.parsed_records, 1);

    let plain = read_lines(&config.output_dir.join("logs_parsed.csv"));
    assert!(plain[1].contains('\u{FFFD}'));

    let utf8 = read_lines(&config.output_dir.join("logs_parsed_utf8.csv"));
    assert!(utf8[1].contains("/caf,"), "replacement char dropped");
    assert!(!utf8[1].contains('\u{FFFD}'));
}
