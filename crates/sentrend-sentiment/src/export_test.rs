use std::path::PathBuf;

use sentrend_core::{MetricValue, Source};

use super::*;
use crate::aggregate::aggregate;
use crate::test_support::{at, metrics, row, table};
use crate::trend::trend;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sentrend-export-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

fn render(write: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut buf = Vec::new();
    write(&mut buf);
    String::from_utf8(buf).unwrap()
}

fn reddit_row(id: &str, subreddit: &str) -> ScoredRecord {
    let mut r = row(Source::Reddit, "UAE", at(2024, 3, 1, 12), 0.5);
    r.id = id.to_string();
    r.metrics = metrics(&[("subreddit", MetricValue::Text(subreddit.into()))]);
    r
}

fn youtube_row(id: &str, likes: i64) -> ScoredRecord {
    let mut r = row(Source::YouTube, "UAE", at(2024, 3, 2, 8), -0.3);
    r.id = id.to_string();
    r.metrics = metrics(&[("like_count", MetricValue::Int(likes))]);
    r
}

fn column<'a>(header: &[String], row: &'a [String], name: &str) -> &'a str {
    let idx = header.iter().position(|c| c == name).unwrap();
    &row[idx]
}

// -----------------------------------------------------------------------
// unified layout
// -----------------------------------------------------------------------

#[test]
fn header_is_canonical_then_sorted_metrics() {
    let t = table(vec![reddit_row("r1", "dubai"), youtube_row("y1", 4)]);
    let out = render(|buf| write_unified_csv(buf, &t, None).unwrap());
    let header = out.lines().next().unwrap();
    assert_eq!(
        header,
        "source,id,text,author,created_at,query,search_term,polarity,subjectivity,\
         vader_positive,vader_negative,vader_neutral,vader_compound,sentiment_category,\
         like_count,subreddit"
    );
}

#[test]
fn collection_timestamp_leads_when_given() {
    let t = table(vec![reddit_row("r1", "dubai")]);
    let out = render(|buf| write_unified_csv(buf, &t, Some(at(2024, 3, 5, 6))).unwrap());
    let mut lines = out.lines();
    assert!(lines
        .next()
        .unwrap()
        .starts_with("collection_timestamp_utc,source,id,"));
    assert!(lines.next().unwrap().starts_with("2024-03-05T06:00:00Z,Reddit,r1,"));
}

#[test]
fn metrics_missing_on_a_row_are_empty_cells() {
    let dir = scratch_dir("empty-cells");
    let path = dir.join("unified.csv");
    let t = table(vec![reddit_row("r1", "dubai"), youtube_row("y1", 4)]);
    write_unified_csv(File::create(&path).unwrap(), &t, None).unwrap();

    let (header, rows) = read_csv(&path);
    assert_eq!(column(&header, &rows[0], "subreddit"), "dubai");
    assert_eq!(column(&header, &rows[0], "like_count"), "");
    assert_eq!(column(&header, &rows[1], "like_count"), "4");
    assert_eq!(column(&header, &rows[1], "subreddit"), "");
    assert_eq!(column(&header, &rows[1], "created_at"), "2024-03-02T08:00:00Z");
    assert_eq!(column(&header, &rows[1], "sentiment_category"), "Negative");
}

#[test]
fn metric_named_like_a_reserved_column_keeps_its_value() {
    let mut r = reddit_row("r1", "dubai");
    r.metrics.insert(
        "query".to_string(),
        MetricValue::Text("metric-value".into()),
    );
    r.metrics.insert(
        COLLECTED_AT_COLUMN.to_string(),
        MetricValue::Text("collector-clock".into()),
    );
    r.metrics.insert(
        "metric_query".to_string(),
        MetricValue::Text("already-prefixed".into()),
    );
    let dir = scratch_dir("reserved-metric");
    let path = dir.join("unified.csv");
    write_unified_csv(File::create(&path).unwrap(), &table(vec![r]), Some(at(2024, 3, 5, 6)))
        .unwrap();

    let (header, rows) = read_csv(&path);
    assert_eq!(header.iter().filter(|c| *c == "query").count(), 1);
    assert_eq!(column(&header, &rows[0], "query"), "UAE");
    assert_eq!(column(&header, &rows[0], "metric_query"), "metric-value");
    assert_eq!(
        column(&header, &rows[0], "metric_metric_query"),
        "already-prefixed"
    );
    assert_eq!(
        column(&header, &rows[0], COLLECTED_AT_COLUMN),
        "2024-03-05T06:00:00Z"
    );
    assert_eq!(
        column(&header, &rows[0], "metric_collection_timestamp_utc"),
        "collector-clock"
    );
}

#[test]
fn empty_table_writes_header_only() {
    let out = render(|buf| write_unified_csv(buf, &UnifiedTable::default(), None).unwrap());
    assert_eq!(out.lines().count(), 1);
}

// -----------------------------------------------------------------------
// append mode
// -----------------------------------------------------------------------

#[test]
fn append_creates_missing_file_with_header() {
    let dir = scratch_dir("append-create");
    let path = dir.join("live.csv");
    let t = table(vec![reddit_row("r1", "dubai")]);

    let outcome = append_unified_csv(&path, &t, Some(at(2024, 3, 1, 0))).unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.rows_written, 1);

    let (header, rows) = read_csv(&path);
    assert_eq!(header[0], COLLECTED_AT_COLUMN);
    assert_eq!(rows.len(), 1);
}

#[test]
fn append_same_schema_adds_rows_without_second_header() {
    let dir = scratch_dir("append-same");
    let path = dir.join("live.csv");
    append_unified_csv(&path, &table(vec![reddit_row("r1", "dubai")]), None).unwrap();
    let outcome =
        append_unified_csv(&path, &table(vec![reddit_row("r2", "travel")]), None).unwrap();

    assert!(!outcome.created);
    assert!(outcome.added_columns.is_empty());
    let (header, rows) = read_csv(&path);
    assert_eq!(rows.len(), 2);
    assert_eq!(column(&header, &rows[1], "id"), "r2");
    assert_eq!(column(&header, &rows[1], "subreddit"), "travel");
}

#[test]
fn append_follows_existing_column_order() {
    let dir = scratch_dir("append-order");
    let path = dir.join("live.csv");
    // A hand-made file with the metric column placed first.
    let mut existing = String::from("subreddit,");
    existing.push_str(&CANONICAL_COLUMNS.join(","));
    existing.push('\n');
    fs::write(&path, existing).unwrap();

    append_unified_csv(&path, &table(vec![reddit_row("r1", "dubai")]), None).unwrap();
    let (header, rows) = read_csv(&path);
    assert_eq!(header[0], "subreddit");
    assert_eq!(rows[0][0], "dubai");
    assert_eq!(rows[0][1], "Reddit");
}

#[test]
fn append_with_new_metric_widens_file() {
    let dir = scratch_dir("append-widen");
    let path = dir.join("live.csv");
    append_unified_csv(&path, &table(vec![reddit_row("r1", "dubai")]), None).unwrap();
    let before = read_csv(&path).0;

    let outcome = append_unified_csv(&path, &table(vec![youtube_row("y1", 9)]), None).unwrap();
    assert_eq!(outcome.added_columns, vec!["like_count".to_string()]);

    let (header, rows) = read_csv(&path);
    assert_eq!(&header[..before.len()], before.as_slice());
    assert_eq!(header.last().unwrap(), "like_count");
    assert_eq!(rows.len(), 2);
    assert_eq!(column(&header, &rows[0], "like_count"), "");
    assert_eq!(column(&header, &rows[0], "subreddit"), "dubai");
    assert_eq!(column(&header, &rows[1], "like_count"), "9");
    assert!(!path.with_extension("csv.tmp").exists());
}

#[test]
fn append_widening_reserved_metric_uses_prefixed_column() {
    let dir = scratch_dir("append-reserved");
    let path = dir.join("live.csv");
    append_unified_csv(&path, &table(vec![reddit_row("r1", "dubai")]), None).unwrap();

    let mut r = reddit_row("r2", "travel");
    r.metrics
        .insert("text".to_string(), MetricValue::Text("raw body".into()));
    let outcome = append_unified_csv(&path, &table(vec![r]), None).unwrap();
    assert_eq!(outcome.added_columns, vec!["metric_text".to_string()]);

    let (header, rows) = read_csv(&path);
    assert_eq!(column(&header, &rows[0], "metric_text"), "");
    assert_eq!(column(&header, &rows[1], "metric_text"), "raw body");
    assert_ne!(column(&header, &rows[1], "text"), "raw body");
}

#[test]
fn failed_rewrite_removes_temp_file_and_keeps_original() {
    let dir = scratch_dir("rewrite-fails");
    let path = dir.join("live.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let err = replace_via_temp(&path, |writer| {
        writer.write_record(["a", "b", "c"])?;
        Err(SentimentError::SchemaMismatch {
            path: path.display().to_string(),
            reason: "interrupted".to_string(),
        })
    })
    .unwrap_err();

    assert!(matches!(err, SentimentError::SchemaMismatch { .. }));
    assert!(!path.with_extension("csv.tmp").exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
}

#[test]
fn successful_rewrite_replaces_file() {
    let dir = scratch_dir("rewrite-ok");
    let path = dir.join("live.csv");
    fs::write(&path, "a\n1\n").unwrap();

    replace_via_temp(&path, |writer| {
        writer.write_record(["a", "b"])?;
        writer.write_record(["1", ""])?;
        Ok(())
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,\n");
    assert!(!path.with_extension("csv.tmp").exists());
}

#[test]
fn append_to_foreign_csv_is_schema_mismatch() {
    let dir = scratch_dir("append-foreign");
    let path = dir.join("other.csv");
    fs::write(&path, "date,open,close\n2024-03-01,1,2\n").unwrap();

    let err = append_unified_csv(&path, &table(vec![reddit_row("r1", "dubai")]), None)
        .unwrap_err();
    assert!(matches!(err, SentimentError::SchemaMismatch { .. }));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "date,open,close\n2024-03-01,1,2\n"
    );
}

// -----------------------------------------------------------------------
// aggregation and trend tables
// -----------------------------------------------------------------------

#[test]
fn counts_csv_has_dimension_and_category_columns() {
    let t = table(vec![
        row(Source::Reddit, "UAE", at(2024, 3, 1, 9), 0.6),
        row(Source::Reddit, "UAE", at(2024, 3, 1, 9), -0.6),
        row(Source::YouTube, "Qatar", at(2024, 3, 1, 9), 0.0),
    ]);
    let result = aggregate(&t);
    let out = render(|buf| write_counts_csv(buf, &result.by_query_source).unwrap());
    assert_eq!(
        out,
        "query,source,negative,neutral,positive\n\
         Qatar,YouTube,0,1,0\n\
         UAE,Reddit,1,0,1\n"
    );
}

#[test]
fn means_csv_reports_both_models() {
    let mut a = row(Source::Reddit, "UAE", at(2024, 3, 1, 9), 0.5);
    a.signals.polarity = 0.25;
    let result = aggregate(&table(vec![a]));
    let out = render(|buf| write_means_csv(buf, &result.by_query).unwrap());
    assert_eq!(out, "query,mean_compound,mean_polarity,rows\nUAE,0.5,0.25,1\n");
}

#[test]
fn trend_csv_lists_daily_and_rolling() {
    let t = table(vec![
        row(Source::Reddit, "UAE", at(2024, 3, 1, 9), 0.2),
        row(Source::Reddit, "UAE", at(2024, 3, 2, 9), 0.4),
    ]);
    let out = render(|buf| write_trend_csv(buf, &trend(&t, 7)).unwrap());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        "query,date,daily_mean_compound,rolling_mean_compound"
    );
    assert_eq!(lines[1], "UAE,2024-03-01,0.2,0.2");
    assert!(lines[2].starts_with("UAE,2024-03-02,0.4,0.3"));
}
