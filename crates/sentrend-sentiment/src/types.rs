use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use sentrend_core::{MetricBag, Source};
use serde::{Deserialize, Serialize};

use crate::category::SentimentCategory;
use crate::scorer::SentimentSignals;

/// One unified row: canonical fields, both models' signals and the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub source: Source,
    pub id: String,
    /// Normalized text that was scored.
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Reporting group (the query group name when an alias matched).
    pub query: String,
    /// Query exactly as the collector sent it.
    pub search_term: String,
    pub signals: SentimentSignals,
    pub category: SentimentCategory,
    /// Source-specific metrics, carried through untouched.
    pub metrics: MetricBag,
}

impl ScoredRecord {
    /// Calendar day of `created_at` in UTC.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Rows produced by one run-cycle, in input order.
///
/// There is no way to mutate rows once the table exists; later stages read
/// it and build their own outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedTable {
    rows: Vec<ScoredRecord>,
}

impl UnifiedTable {
    #[must_use]
    pub fn new(rows: Vec<ScoredRecord>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[ScoredRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredRecord> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every metric key present on at least one row, sorted.
    #[must_use]
    pub fn metric_keys(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.metrics.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest `created_at`, or `None` for an empty table.
    #[must_use]
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min = self.rows.iter().map(|r| r.created_at).min()?;
        let max = self.rows.iter().map(|r| r.created_at).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a UnifiedTable {
    type Item = &'a ScoredRecord;
    type IntoIter = std::slice::Iter<'a, ScoredRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
