//! Markdown rendering of a finished run-cycle.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::aggregate::{key_label, AggregationResult};
use crate::category::SentimentCategory;
use crate::insights::{sample_records, summarize, top_metric_values};
use crate::trend::TrendSeries;
use crate::types::UnifiedTable;
use crate::unify::UnifyReport;

/// Knobs for [`build_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Sample rows shown per (query, polarity) section.
    pub sample_size: usize,
    /// Metric whose most frequent values are listed.
    pub top_metric: String,
    pub top_n: usize,
    /// Sample texts longer than this many characters are cut.
    pub excerpt_chars: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sample_size: 3,
            top_metric: "subreddit".to_string(),
            top_n: 10,
            excerpt_chars: 200,
        }
    }
}

/// Everything one report is rendered from.
pub struct ReportInput<'a> {
    pub table: &'a UnifiedTable,
    pub unify: &'a UnifyReport,
    pub aggregation: &'a AggregationResult,
    pub trend: &'a TrendSeries,
    pub generated_at: DateTime<Utc>,
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

/// Escape text for a markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn fmt_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(|| "n/a".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

/// Render the run-cycle report.
///
/// An empty table still renders a header and a note instead of tables.
#[must_use]
pub fn build_report(input: &ReportInput<'_>, options: &ReportOptions) -> String {
    let mut out = String::new();
    let summary = summarize(input.table);

    let _ = writeln!(out, "# Sentiment Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Generated**: {}",
        input.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "**Rows analyzed**: {}", summary.total_rows);
    let _ = writeln!(
        out,
        "**Rejected**: {} ({} degraded rows kept)",
        input.unify.rejected_count(),
        input.unify.degraded
    );
    let _ = writeln!(
        out,
        "**Date range**: {} to {}",
        fmt_ts(summary.earliest),
        fmt_ts(summary.latest)
    );
    let _ = writeln!(out);

    if input.aggregation.is_empty() {
        let _ = writeln!(out, "No records to analyze.");
        return out;
    }

    let _ = writeln!(out, "## Sentiment by Query");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "| Query | Negative | Neutral | Positive | Mean Compound | Mean Polarity |"
    );
    let _ = writeln!(
        out,
        "|-------|----------|---------|----------|---------------|---------------|"
    );
    for (key, stats) in input.aggregation.by_query.iter() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.3} | {:.3} |",
            table_cell(&key_label(key)),
            stats.counts.negative,
            stats.counts.neutral,
            stats.counts.positive,
            stats.mean_compound,
            stats.mean_polarity
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Sentiment by Query and Source");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Group | Negative | Neutral | Positive | Mean Compound |");
    let _ = writeln!(out, "|-------|----------|---------|----------|---------------|");
    for (key, stats) in input.aggregation.by_query_source.iter() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.3} |",
            table_cell(&key_label(key)),
            stats.counts.negative,
            stats.counts.neutral,
            stats.counts.positive,
            stats.mean_compound
        );
    }
    let _ = writeln!(out);

    let top = top_metric_values(input.table, &options.top_metric, options.top_n);
    if !top.is_empty() {
        let _ = writeln!(out, "## Top {} Values", options.top_metric);
        let _ = writeln!(out);
        for (value, count) in &top {
            let _ = writeln!(out, "- {value}: {count}");
        }
        let _ = writeln!(out);
    }

    if !input.trend.is_empty() {
        let _ = writeln!(
            out,
            "## Latest Trend ({}-point rolling mean)",
            input.trend.window
        );
        let _ = writeln!(out);
        for (query, trend) in &input.trend.queries {
            if let Some(point) = trend.latest_rolling() {
                let _ = writeln!(
                    out,
                    "- {query}: {:.3} as of {}",
                    point.value,
                    point.date.format("%Y-%m-%d")
                );
            }
        }
        let _ = writeln!(out);
    }

    if options.sample_size > 0 {
        for (key, _) in input.aggregation.by_query.iter() {
            let query = key_label(key);
            for category in [SentimentCategory::Positive, SentimentCategory::Negative] {
                let samples =
                    sample_records(input.table, &query, category, options.sample_size);
                if samples.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "## Sample {category} Records: {query}");
                let _ = writeln!(out);
                for row in samples {
                    let _ = writeln!(
                        out,
                        "- [{}] {:.3}: {}",
                        row.source,
                        row.signals.compound,
                        excerpt(&row.text, options.excerpt_chars)
                    );
                }
                let _ = writeln!(out);
            }
        }
    }

    out
}

/// Render daily and rolling values per query, optionally for one query only.
#[must_use]
pub fn build_trend_report(series: &TrendSeries, query: Option<&str>) -> String {
    let mut out = String::new();
    let mut shown = 0;

    for (name, trend) in &series.queries {
        if query.is_some_and(|q| q != name.as_str()) {
            continue;
        }
        shown += 1;
        let _ = writeln!(out, "## {name}");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Date | Daily Mean | Rolling Mean ({}) |", series.window);
        let _ = writeln!(out, "|------|------------|------------------|");
        for (daily, rolling) in trend.daily.iter().zip(&trend.rolling) {
            let _ = writeln!(
                out,
                "| {} | {:.4} | {:.4} |",
                daily.date.format("%Y-%m-%d"),
                daily.value,
                rolling.value
            );
        }
        let _ = writeln!(out);
    }

    if shown == 0 {
        let _ = writeln!(out, "No trend data.");
    }
    out
}
