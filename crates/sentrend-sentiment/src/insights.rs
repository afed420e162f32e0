use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sentrend_core::MetricValue;

use crate::category::SentimentCategory;
use crate::types::{ScoredRecord, UnifiedTable};

/// Table-level totals shown at the top of every report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_rows: usize,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

#[must_use]
pub fn summarize(table: &UnifiedTable) -> Summary {
    let range = table.date_range();
    Summary {
        total_rows: table.len(),
        earliest: range.map(|(min, _)| min),
        latest: range.map(|(_, max)| max),
    }
}

/// Most frequent values of the metric `key`, e.g. the busiest subreddits.
///
/// Only string values are counted; rows without the key are ignored.
/// Sorted by count descending, then by value ascending.
#[must_use]
pub fn top_metric_values(table: &UnifiedTable, key: &str, n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in table {
        if let Some(value) = row.metrics.get(key).and_then(MetricValue::as_text) {
            *counts.entry(value.to_string()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Up to `n` rows of `query` labelled `category`, highest compound first.
///
/// Ties keep table order.
#[must_use]
pub fn sample_records<'a>(
    table: &'a UnifiedTable,
    query: &str,
    category: SentimentCategory,
    n: usize,
) -> Vec<&'a ScoredRecord> {
    let mut matching: Vec<&ScoredRecord> = table
        .iter()
        .filter(|row| row.query == query && row.category == category)
        .collect();
    matching.sort_by(|a, b| b.signals.compound.total_cmp(&a.signals.compound));
    matching.truncate(n);
    matching
}
