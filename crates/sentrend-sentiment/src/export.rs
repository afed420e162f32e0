//! CSV writers for the unified table, the aggregation tables and trends.
//!
//! The unified layout is the canonical columns followed by every observed
//! metric key, sorted. A row lacking a metric gets an empty cell. A metric
//! key that names a reserved column, or already starts with `metric_`, is
//! written as `metric_<key>` so no metric shadows another column.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::aggregate::GroupedTable;
use crate::error::SentimentError;
use crate::trend::TrendSeries;
use crate::types::{ScoredRecord, UnifiedTable};

/// Leading column written when a collection timestamp is supplied.
pub const COLLECTED_AT_COLUMN: &str = "collection_timestamp_utc";

pub const CANONICAL_COLUMNS: [&str; 14] = [
    "source",
    "id",
    "text",
    "author",
    "created_at",
    "query",
    "search_term",
    "polarity",
    "subjectivity",
    "vader_positive",
    "vader_negative",
    "vader_neutral",
    "vader_compound",
    "sentiment_category",
];

/// What [`append_unified_csv`] did to the target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub rows_written: usize,
    /// The file did not exist (or was empty) and was created with a header.
    pub created: bool,
    /// Columns added to an existing header, in the order they were appended.
    pub added_columns: Vec<String>,
}

const METRIC_PREFIX: &str = "metric_";

fn is_reserved(name: &str) -> bool {
    name == COLLECTED_AT_COLUMN || CANONICAL_COLUMNS.contains(&name)
}

/// Column name for a metric key. Distinct keys always get distinct columns.
fn metric_column(key: &str) -> String {
    if is_reserved(key) || key.starts_with(METRIC_PREFIX) {
        format!("{METRIC_PREFIX}{key}")
    } else {
        key.to_string()
    }
}

/// Inverse of [`metric_column`].
fn metric_key(column: &str) -> &str {
    column.strip_prefix(METRIC_PREFIX).unwrap_or(column)
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn unified_header(table: &UnifiedTable, collected_at: Option<DateTime<Utc>>) -> Vec<String> {
    let mut header = Vec::with_capacity(CANONICAL_COLUMNS.len() + 1);
    if collected_at.is_some() {
        header.push(COLLECTED_AT_COLUMN.to_string());
    }
    header.extend(CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()));
    header.extend(table.metric_keys().iter().map(|key| metric_column(key)));
    header
}

fn cell(row: &ScoredRecord, column: &str, collected_at: Option<DateTime<Utc>>) -> String {
    match column {
        COLLECTED_AT_COLUMN => collected_at.map(timestamp).unwrap_or_default(),
        "source" => row.source.to_string(),
        "id" => row.id.clone(),
        "text" => row.text.clone(),
        "author" => row.author.clone(),
        "created_at" => timestamp(row.created_at),
        "query" => row.query.clone(),
        "search_term" => row.search_term.clone(),
        "polarity" => row.signals.polarity.to_string(),
        "subjectivity" => row.signals.subjectivity.to_string(),
        "vader_positive" => row.signals.positive.to_string(),
        "vader_negative" => row.signals.negative.to_string(),
        "vader_neutral" => row.signals.neutral.to_string(),
        "vader_compound" => row.signals.compound.to_string(),
        "sentiment_category" => row.category.to_string(),
        metric => row
            .metrics
            .get(metric_key(metric))
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

fn write_rows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    table: &UnifiedTable,
    header: &[String],
    collected_at: Option<DateTime<Utc>>,
) -> Result<(), SentimentError> {
    for row in table {
        writer.write_record(header.iter().map(|column| cell(row, column, collected_at)))?;
    }
    Ok(())
}

/// Write `table` as CSV with a header line.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] or [`SentimentError::Io`] if writing fails.
pub fn write_unified_csv<W: io::Write>(
    writer: W,
    table: &UnifiedTable,
    collected_at: Option<DateTime<Utc>>,
) -> Result<(), SentimentError> {
    let header = unified_header(table, collected_at);
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&header)?;
    write_rows(&mut writer, table, &header, collected_at)?;
    writer.flush()?;
    Ok(())
}

fn read_existing(path: &Path) -> Result<(Vec<String>, Vec<csv::StringRecord>), SentimentError> {
    let mut reader = csv::Reader::from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    for required in CANONICAL_COLUMNS {
        if !header.iter().any(|c| c == required) {
            return Err(SentimentError::SchemaMismatch {
                path: path.display().to_string(),
                reason: format!("missing column `{required}`"),
            });
        }
    }

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok((header, records))
}

/// Write a replacement for `path` into `<path>.csv.tmp`, then rename it
/// over `path`. On failure the temp file is removed and `path` is untouched.
fn replace_via_temp<F>(path: &Path, write: F) -> Result<(), SentimentError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), SentimentError>,
{
    let tmp = path.with_extension("csv.tmp");
    let result = csv::Writer::from_path(&tmp)
        .map_err(SentimentError::from)
        .and_then(|mut writer| {
            write(&mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&tmp, path).map_err(SentimentError::from));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Append `table` to the CSV at `path`, the way a long-running collector
/// accumulates one file.
///
/// A missing or empty file is created with a full header. Otherwise rows
/// follow the existing header's column order. When the batch carries
/// columns the file lacks, the file is rewritten with those columns
/// appended after the existing ones; earlier rows get empty cells.
///
/// # Errors
///
/// Returns [`SentimentError::SchemaMismatch`] if the existing header lacks a
/// canonical column, or an I/O or CSV error if reading or writing fails.
pub fn append_unified_csv(
    path: &Path,
    table: &UnifiedTable,
    collected_at: Option<DateTime<Utc>>,
) -> Result<AppendOutcome, SentimentError> {
    let is_new = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    if is_new {
        write_unified_csv(File::create(path)?, table, collected_at)?;
        tracing::info!(path = %path.display(), rows = table.len(), "created unified csv");
        return Ok(AppendOutcome {
            rows_written: table.len(),
            created: true,
            added_columns: Vec::new(),
        });
    }

    let (mut header, existing) = read_existing(path)?;
    let added_columns: Vec<String> = unified_header(table, collected_at)
        .into_iter()
        .filter(|column| !header.contains(column))
        .collect();

    if added_columns.is_empty() {
        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        write_rows(&mut writer, table, &header, collected_at)?;
        writer.flush()?;
    } else {
        let old_width = header.len();
        header.extend(added_columns.iter().cloned());

        replace_via_temp(path, |writer| {
            writer.write_record(&header)?;
            for record in &existing {
                let padded = record
                    .iter()
                    .chain(std::iter::repeat("").take(header.len() - old_width));
                writer.write_record(padded)?;
            }
            write_rows(writer, table, &header, collected_at)
        })?;
        tracing::warn!(
            path = %path.display(),
            added = ?added_columns,
            "unified csv schema widened; file rewritten"
        );
    }

    tracing::info!(path = %path.display(), rows = table.len(), "appended unified csv");
    Ok(AppendOutcome {
        rows_written: table.len(),
        created: false,
        added_columns,
    })
}

/// Category counts per group: the grouping columns, then
/// `negative,neutral,positive`.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] or [`SentimentError::Io`] if writing fails.
pub fn write_counts_csv<W: io::Write>(
    writer: W,
    grouped: &GroupedTable,
) -> Result<(), SentimentError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = grouped.dimensions.iter().map(|d| d.as_str()).collect();
    header.extend(["negative", "neutral", "positive"]);
    writer.write_record(&header)?;

    for (key, stats) in grouped.iter() {
        let mut record: Vec<String> = key.iter().map(ToString::to_string).collect();
        record.push(stats.counts.negative.to_string());
        record.push(stats.counts.neutral.to_string());
        record.push(stats.counts.positive.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Mean compound, mean polarity and row count per group.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] or [`SentimentError::Io`] if writing fails.
pub fn write_means_csv<W: io::Write>(
    writer: W,
    grouped: &GroupedTable,
) -> Result<(), SentimentError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = grouped.dimensions.iter().map(|d| d.as_str()).collect();
    header.extend(["mean_compound", "mean_polarity", "rows"]);
    writer.write_record(&header)?;

    for (key, stats) in grouped.iter() {
        let mut record: Vec<String> = key.iter().map(ToString::to_string).collect();
        record.push(stats.mean_compound.to_string());
        record.push(stats.mean_polarity.to_string());
        record.push(stats.counts.total().to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// One line per (query, day): `query,date,daily_mean_compound,rolling_mean_compound`.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] or [`SentimentError::Io`] if writing fails.
pub fn write_trend_csv<W: io::Write>(writer: W, series: &TrendSeries) -> Result<(), SentimentError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "query",
        "date",
        "daily_mean_compound",
        "rolling_mean_compound",
    ])?;

    for (query, trend) in &series.queries {
        for (daily, rolling) in trend.daily.iter().zip(&trend.rolling) {
            writer.write_record([
                query.clone(),
                daily.date.format("%Y-%m-%d").to_string(),
                daily.value.to_string(),
                rolling.value.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
