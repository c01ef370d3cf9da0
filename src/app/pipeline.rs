// LogTally - app/pipeline.rs
//
// Single-pass batch pipeline: read input → parse → aggregate → render →
// export. Runs to completion or fails outright; there is no partial-result
// mode and no retry of failed stages.

use crate::app::config::AppConfig;
use crate::app::render;
use crate::core::export;
use crate::core::model::RunSummary;
use crate::core::parser;
use crate::core::stats;
use crate::util::error::{LogTallyError, Result};
use std::path::Path;
use std::time::Instant;

/// Run the full pipeline.
///
/// `summary_json` optionally adds a JSON run-summary artifact after the
/// three CSV exports. Returns the summary on success; any I/O failure
/// aborts the run with the error propagated to the caller.
pub fn run(config: &AppConfig, summary_json: Option<&Path>) -> Result<RunSummary> {
    let started = Instant::now();

    tracing::info!(
        input = %config.input_path.display(),
        output = %config.output_dir.display(),
        "Run started"
    );

    // -------------------------------------------------------------------------
    // Read + parse
    // -------------------------------------------------------------------------
    // The input is decoded lossily: invalid UTF-8 becomes U+FFFD, which the
    // relational export later drops instead of failing the run.
    let bytes = std::fs::read(&config.input_path).map_err(|e| LogTallyError::Input {
        path: config.input_path.clone(),
        source: e,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let parsed = parser::parse_content(&content);
    let records = parsed.records;

    // -------------------------------------------------------------------------
    // Aggregate
    // -------------------------------------------------------------------------
    let codes = stats::status_distribution(&records);
    let pages = stats::page_hits(&records);
    let methods = stats::method_usage(&records);
    let clients = stats::client_activity(&records);
    let daily = stats::daily_volume(&records);

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------
    render::record_preview(&records, config.preview_rows);
    render::aggregate_table("HTTP status code distribution", &codes, None);
    render::aggregate_table("Most requested pages", &pages, Some(config.preview_rows));
    render::aggregate_table("HTTP method usage", &methods, None);
    render::aggregate_table("Most active clients", &clients, Some(config.preview_rows));
    render::daily_table(&daily);

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------
    let mut exports = Vec::new();
    exports.push(export::export_codes(&codes, &config.output_dir)?);
    exports.push(export::export_records(&records, &config.output_dir)?);
    exports.push(export::export_records_utf8(&records, &config.output_dir)?);

    // -------------------------------------------------------------------------
    // Summarise
    // -------------------------------------------------------------------------
    let dated_records = records.iter().filter(|r| r.date.is_some()).count() as u64;
    let mut summary = RunSummary {
        input_path: config.input_path.clone(),
        total_lines: parsed.total_lines,
        parsed_records: records.len() as u64,
        unmatched_lines: parsed.unmatched_lines,
        dated_records,
        undated_records: records.len() as u64 - dated_records,
        earliest_date: records.iter().filter_map(|r| r.date).min(),
        latest_date: records.iter().filter_map(|r| r.date).max(),
        duration_ms: started.elapsed().as_millis() as u64,
        exports,
    };

    if let Some(path) = summary_json {
        export::export_summary_json(&summary, path)?;
        summary.exports.push(path.to_path_buf());
    }

    render::run_summary(&summary);

    tracing::info!(
        records = summary.parsed_records,
        unmatched = summary.unmatched_lines,
        duration_ms = summary.duration_ms,
        "Run complete"
    );

    Ok(summary)
}
