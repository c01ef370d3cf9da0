// LogTally - core/stats.rs
//
// Grouped counting aggregations over the parsed record set.
// Core layer: pure logic, no I/O.
//
// Every aggregate is recomputed in full on each run; nothing persists
// between runs. Count-ordered aggregates break ties by key ascending so
// repeated runs on identical input produce identical output.

use crate::core::model::{AccessRecord, AggregateRow, DailyCount};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Group records by a string key and count occurrences, sorted by count
/// descending with key ascending as the deterministic tiebreak.
fn count_by<'a, F>(records: &'a [AccessRecord], key_fn: F) -> Vec<AggregateRow>
where
    F: Fn(&'a AccessRecord) -> &'a str,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in records {
        *counts.entry(key_fn(record)).or_insert(0) += 1;
    }

    let mut rows: Vec<AggregateRow> = counts
        .into_iter()
        .map(|(key, count)| AggregateRow {
            key: key.to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows
}

/// HTTP status code distribution. Counts sum to the record count.
pub fn status_distribution(records: &[AccessRecord]) -> Vec<AggregateRow> {
    count_by(records, |r| &r.status)
}

/// Request counts per page path.
pub fn page_hits(records: &[AccessRecord]) -> Vec<AggregateRow> {
    count_by(records, |r| &r.path)
}

/// Request counts per HTTP method.
pub fn method_usage(records: &[AccessRecord]) -> Vec<AggregateRow> {
    count_by(records, |r| &r.method)
}

/// Request counts per client address.
pub fn client_activity(records: &[AccessRecord]) -> Vec<AggregateRow> {
    count_by(records, |r| &r.client_addr)
}

/// Daily request volume, sorted by date ascending regardless of count.
///
/// Records without a derived date are excluded; an unparsable timestamp
/// drops the record from this aggregate only.
pub fn daily_volume(records: &[AccessRecord]) -> Vec<DailyCount> {
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for record in records {
        if let Some(date) = record.date {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<DailyCount> = counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    rows.sort_by_key(|row| row.date);
    rows
}
