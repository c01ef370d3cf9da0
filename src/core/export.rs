// LogTally - core/export.rs
//
// CSV export of aggregates and the parsed dataset, plus the JSON run
// summary. Row serialisation writes to any Write trait object; the
// publish step owns the filesystem side.
//
// Every logical export must end as exactly one physical file. Rows are
// written to a part-NNNNN.csv shard inside a private shard directory next
// to the final path; publishing selects the first non-empty shard in name
// order, renames it to the final path (overwriting any previous run's
// file), and removes the shard directory entirely.

use crate::core::model::{AccessRecord, AggregateRow, RunSummary};
use crate::util::constants;
use crate::util::error::ExportError;
use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// =============================================================================
// Row serialisation
// =============================================================================

/// Write the status code distribution. Columns: Code, count.
pub fn write_codes_csv<W: Write>(
    rows: &[AggregateRow],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["Code", "count"])
        .map_err(|e| csv_err(export_path, e))?;

    for row in rows {
        csv_writer
            .write_record([row.key.as_str(), &row.count.to_string()])
            .map_err(|e| csv_err(export_path, e))?;
    }

    csv_writer.flush().map_err(|e| io_err(export_path, e))?;
    Ok(rows.len())
}

/// Write the full parsed dataset.
/// Columns: IP, Timestamp, Method, Page, Code, Date.
pub fn write_records_csv<W: Write>(
    records: &[AccessRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["IP", "Timestamp", "Method", "Page", "Code", "Date"])
        .map_err(|e| csv_err(export_path, e))?;

    for record in records {
        csv_writer
            .write_record([
                record.client_addr.as_str(),
                &record.timestamp_raw,
                &record.method,
                &record.path,
                &record.status,
                &format_date(record),
            ])
            .map_err(|e| csv_err(export_path, e))?;
    }

    csv_writer.flush().map_err(|e| io_err(export_path, e))?;
    Ok(records.len())
}

/// Write the dataset with column names normalised for relational loading
/// (lowercase, date column renamed `log_date`) and characters that did not
/// survive input decoding dropped rather than failing the export.
pub fn write_records_csv_utf8<W: Write>(
    records: &[AccessRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["ip", "timestamp", "method", "page", "code", "log_date"])
        .map_err(|e| csv_err(export_path, e))?;

    for record in records {
        csv_writer
            .write_record([
                sanitize(&record.client_addr).as_ref(),
                sanitize(&record.timestamp_raw).as_ref(),
                sanitize(&record.method).as_ref(),
                sanitize(&record.path).as_ref(),
                sanitize(&record.status).as_ref(),
                &format_date(record),
            ])
            .map_err(|e| csv_err(export_path, e))?;
    }

    csv_writer.flush().map_err(|e| io_err(export_path, e))?;
    Ok(records.len())
}

fn format_date(record: &AccessRecord) -> String {
    record
        .date
        .map(|d| d.format(constants::EXPORT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Drop U+FFFD replacement characters introduced by lossy input decoding.
/// Allocates only when a field actually contains one.
fn sanitize(field: &str) -> Cow<'_, str> {
    if field.contains(char::REPLACEMENT_CHARACTER) {
        Cow::Owned(
            field
                .chars()
                .filter(|c| *c != char::REPLACEMENT_CHARACTER)
                .collect(),
        )
    } else {
        Cow::Borrowed(field)
    }
}

fn csv_err(path: &Path, source: csv::Error) -> ExportError {
    ExportError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_err(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// =============================================================================
// Single-artifact publish
// =============================================================================

/// Write one logical export under `out_dir` and publish it as exactly one
/// file named `file_name`.
///
/// The shard directory is private to this export and recreated from
/// scratch, so a shard left behind by an aborted run cannot leak into the
/// published file.
fn publish<F>(out_dir: &Path, file_name: &str, write_shard: F) -> Result<PathBuf, ExportError>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<usize, ExportError>,
{
    fs::create_dir_all(out_dir).map_err(|e| io_err(out_dir, e))?;

    let shard_dir = out_dir.join(format!(".{file_name}{}", constants::SHARD_DIR_SUFFIX));
    if shard_dir.exists() {
        fs::remove_dir_all(&shard_dir).map_err(|e| io_err(&shard_dir, e))?;
    }
    fs::create_dir_all(&shard_dir).map_err(|e| io_err(&shard_dir, e))?;

    let shard_path = shard_dir.join(format!("{}00000.csv", constants::SHARD_FILE_PREFIX));
    let file = fs::File::create(&shard_path).map_err(|e| io_err(&shard_path, e))?;
    let mut writer = BufWriter::new(file);
    let rows = write_shard(&mut writer)?;
    writer.flush().map_err(|e| io_err(&shard_path, e))?;

    let chosen = select_shard(&shard_dir)?;
    let final_path = out_dir.join(file_name);
    fs::rename(&chosen, &final_path).map_err(|e| io_err(&final_path, e))?;
    fs::remove_dir_all(&shard_dir).map_err(|e| io_err(&shard_dir, e))?;

    tracing::info!(path = %final_path.display(), rows, "Export published");
    Ok(final_path)
}

/// Pick the shard to publish: first non-empty `part-*` file in name order.
fn select_shard(shard_dir: &Path) -> Result<PathBuf, ExportError> {
    let mut shards: Vec<PathBuf> = fs::read_dir(shard_dir)
        .map_err(|e| io_err(shard_dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(constants::SHARD_FILE_PREFIX))
        })
        .collect();
    shards.sort();

    shards
        .into_iter()
        .find(|path| fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false))
        .ok_or_else(|| ExportError::MissingShard {
            dir: shard_dir.to_path_buf(),
        })
}

fn check_record_count(count: usize) -> Result<(), ExportError> {
    if count > constants::MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count,
            max: constants::MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

/// Export the status code distribution as `codes_distribution.csv`.
pub fn export_codes(rows: &[AggregateRow], out_dir: &Path) -> Result<PathBuf, ExportError> {
    let final_path = out_dir.join(constants::CODES_EXPORT_FILE);
    publish(out_dir, constants::CODES_EXPORT_FILE, |writer| {
        write_codes_csv(rows, writer, &final_path)
    })
}

/// Export the full dataset as `logs_parsed.csv`.
pub fn export_records(records: &[AccessRecord], out_dir: &Path) -> Result<PathBuf, ExportError> {
    check_record_count(records.len())?;
    let final_path = out_dir.join(constants::LOGS_EXPORT_FILE);
    publish(out_dir, constants::LOGS_EXPORT_FILE, |writer| {
        write_records_csv(records, writer, &final_path)
    })
}

/// Export the relational-load variant as `logs_parsed_utf8.csv`.
pub fn export_records_utf8(
    records: &[AccessRecord],
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    check_record_count(records.len())?;
    let final_path = out_dir.join(constants::LOGS_UTF8_EXPORT_FILE);
    publish(out_dir, constants::LOGS_UTF8_EXPORT_FILE, |writer| {
        write_records_csv_utf8(records, writer, &final_path)
    })
}

/// Write the run summary as pretty-printed JSON at `path`, overwriting.
pub fn export_summary_json(summary: &RunSummary, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }
    let file = fs::File::create(path).map_err(|e| io_err(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary).map_err(|e| ExportError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
