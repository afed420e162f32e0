//! Sentiment aggregation and trend engine for `sentrend`.
//!
//! Takes raw text records from several social platforms, normalizes and
//! scores each one with two independent models (a lexical polarity and
//! subjectivity model, and a rule-based valence model), labels it from the
//! valence compound score, and merges everything into one [`UnifiedTable`].
//! The table is then aggregated by query, source and day, and a rolling
//! mean of daily compound scores is tracked per query.
//!
//! Collectors stay outside this crate. [`ingest`] reads their JSON-lines
//! output; [`export`] and [`report`] write the results.

pub mod aggregate;
pub mod category;
pub mod error;
pub mod export;
pub mod ingest;
pub mod insights;
pub mod normalize;
pub mod report;
pub mod scorer;
pub mod trend;
pub mod types;
pub mod unify;

mod polarity;
mod vader;

#[cfg(test)]
mod test_support;

pub use aggregate::{
    aggregate, group_by, key_label, AggregationResult, CategoryCounts, Dimension, GroupKey,
    GroupStats, GroupedTable, KeyPart,
};
pub use category::{categorize, SentimentCategory};
pub use error::SentimentError;
pub use export::{
    append_unified_csv, write_counts_csv, write_means_csv, write_trend_csv, write_unified_csv,
    AppendOutcome,
};
pub use ingest::{read_jsonl, read_jsonl_file, IngestOutcome};
pub use insights::{sample_records, summarize, top_metric_values, Summary};
pub use normalize::normalize;
pub use report::{build_report, build_trend_report, ReportInput, ReportOptions};
pub use scorer::{score, try_score, SentimentSignals};
pub use trend::{
    rolling_mean, trend, trend_with_policy, GapPolicy, QueryTrend, TrendPoint, TrendSeries,
    DEFAULT_WINDOW,
};
pub use types::{ScoredRecord, UnifiedTable};
pub use unify::{unify, RejectReason, Rejection, Unified, UnifyConfig, UnifyReport};
