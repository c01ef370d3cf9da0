// LogTally - app/render.rs
//
// Plain-text tables on stdout. Diagnostics go to stderr via tracing;
// stdout carries only the preview and summary output.

use crate::core::model::{AccessRecord, AggregateRow, DailyCount, RunSummary};
use crate::util::constants;

/// Truncate a cell to `width` display characters, ellipsis-terminated.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Print the first `limit` parsed records.
pub fn record_preview(records: &[AccessRecord], limit: usize) {
    let w = constants::PREVIEW_KEY_WIDTH;

    println!("Parsed log preview:");
    println!(
        "{:<15} | {:<20} | {:<6} | {:<w$} | {:<4} | Date",
        "IP", "Timestamp", "Method", "Page", "Code"
    );
    println!(
        "{:-<15}-+-{:-<20}-+-{:-<6}-+-{:-<w$}-+-{:-<4}-+-----------",
        "", "", "", "", ""
    );

    for record in records.iter().take(limit) {
        let date = record
            .date
            .map(|d| d.format(constants::EXPORT_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<15} | {:<20} | {:<6} | {:<w$} | {:<4} | {date}",
            clip(&record.client_addr, 15),
            clip(&record.timestamp_raw, 20),
            clip(&record.method, 6),
            clip(&record.path, w),
            record.status,
        );
    }

    if records.len() > limit {
        println!("... ({} more rows)", records.len() - limit);
    }
}

/// Print one grouped-count table. `limit` is a presentation concern only;
/// the aggregate itself is never truncated.
pub fn aggregate_table(title: &str, rows: &[AggregateRow], limit: Option<usize>) {
    let w = constants::PREVIEW_KEY_WIDTH;
    let shown = limit.unwrap_or(rows.len()).min(rows.len());

    println!();
    println!("{title}:");
    for row in &rows[..shown] {
        println!("{:<w$} | {:>8}", clip(&row.key, w), row.count);
    }
    if rows.len() > shown {
        println!("... ({} more rows)", rows.len() - shown);
    }
}

/// Print the daily request volume table.
pub fn daily_table(rows: &[DailyCount]) {
    println!();
    println!("Requests per day:");
    for row in rows {
        println!(
            "{:<10} | {:>8}",
            row.date.format(constants::EXPORT_DATE_FORMAT),
            row.count
        );
    }
}

/// Print run totals and export artifact paths.
pub fn run_summary(summary: &RunSummary) {
    println!();
    println!("Run summary:");
    println!("  lines read:       {}", summary.total_lines);
    println!("  parsed records:   {}", summary.parsed_records);
    println!("  unmatched lines:  {}", summary.unmatched_lines);
    println!("  dated records:    {}", summary.dated_records);
    println!("  undated records:  {}", summary.undated_records);
    if let (Some(earliest), Some(latest)) = (summary.earliest_date, summary.latest_date) {
        println!(
            "  date range:       {} .. {}",
            earliest.format(constants::EXPORT_DATE_FORMAT),
            latest.format(constants::EXPORT_DATE_FORMAT)
        );
    }
    println!("  duration:         {} ms", summary.duration_ms);
    for path in &summary.exports {
        println!("Export ready: {}", path.display());
    }
}
