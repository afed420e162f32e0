//! Grouped counts and means over a [`UnifiedTable`].
//!
//! Every grouping is an independent reduction over the table's rows, keyed
//! by exact equality of the key parts. Results live in `BTreeMap`s so
//! iteration order is stable across runs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sentrend_core::Source;

use crate::category::SentimentCategory;
use crate::types::{ScoredRecord, UnifiedTable};

/// A column a table can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Query,
    Source,
    /// Calendar day of `created_at`, UTC.
    Date,
}

impl Dimension {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Query => "query",
            Dimension::Source => "source",
            Dimension::Date => "date",
        }
    }

    fn key_part(self, row: &ScoredRecord) -> KeyPart {
        match self {
            Dimension::Query => KeyPart::Query(row.query.clone()),
            Dimension::Source => KeyPart::Source(row.source.clone()),
            Dimension::Date => KeyPart::Date(row.date()),
        }
    }
}

/// One component of a composite group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Query(String),
    Source(Source),
    Date(NaiveDate),
}

impl std::fmt::Display for KeyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPart::Query(q) => f.write_str(q),
            KeyPart::Source(s) => write!(f, "{s}"),
            KeyPart::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Composite key, one part per grouping dimension in order.
pub type GroupKey = Vec<KeyPart>;

/// Render a key the way reports label it, e.g. `"UAE - Reddit"`.
#[must_use]
pub fn key_label(key: &[KeyPart]) -> String {
    key.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Contingency row: rows per sentiment category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl CategoryCounts {
    #[must_use]
    pub fn get(&self, category: SentimentCategory) -> usize {
        match category {
            SentimentCategory::Negative => self.negative,
            SentimentCategory::Neutral => self.neutral,
            SentimentCategory::Positive => self.positive,
        }
    }

    fn add(&mut self, category: SentimentCategory) {
        match category {
            SentimentCategory::Negative => self.negative += 1,
            SentimentCategory::Neutral => self.neutral += 1,
            SentimentCategory::Positive => self.positive += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive
    }
}

/// Everything computed for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStats {
    pub counts: CategoryCounts,
    /// Mean valence-model compound score.
    pub mean_compound: f64,
    /// Mean lexical-model polarity, kept separate from `mean_compound`.
    pub mean_polarity: f64,
}

/// Result of grouping a table along a fixed list of dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    pub dimensions: Vec<Dimension>,
    pub groups: BTreeMap<GroupKey, GroupStats>,
}

impl GroupedTable {
    #[must_use]
    pub fn get(&self, key: &[KeyPart]) -> Option<&GroupStats> {
        self.groups.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupStats)> {
        self.groups.iter()
    }
}

#[derive(Default)]
struct Accumulator {
    counts: CategoryCounts,
    compound_sum: f64,
    polarity_sum: f64,
}

/// Group `table` by `dimensions` and reduce each group to counts and means.
///
/// An empty table yields an empty [`GroupedTable`].
#[must_use]
pub fn group_by(table: &UnifiedTable, dimensions: &[Dimension]) -> GroupedTable {
    let mut accumulators: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();

    for row in table {
        let key: GroupKey = dimensions.iter().map(|d| d.key_part(row)).collect();
        let acc = accumulators.entry(key).or_default();
        acc.counts.add(row.category);
        acc.compound_sum += row.signals.compound;
        acc.polarity_sum += row.signals.polarity;
    }

    let groups = accumulators
        .into_iter()
        .map(|(key, acc)| {
            #[allow(clippy::cast_precision_loss)]
            let n = acc.counts.total() as f64;
            let stats = GroupStats {
                counts: acc.counts,
                mean_compound: acc.compound_sum / n,
                mean_polarity: acc.polarity_sum / n,
            };
            (key, stats)
        })
        .collect();

    GroupedTable {
        dimensions: dimensions.to_vec(),
        groups,
    }
}

/// The standard set of groupings reported per run-cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub by_query: GroupedTable,
    pub by_query_source: GroupedTable,
    pub by_date_query: GroupedTable,
}

impl AggregationResult {
    /// `true` when the source table had no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_query.is_empty()
    }

    /// Contingency row for one query group.
    #[must_use]
    pub fn counts_for_query(&self, query: &str) -> Option<CategoryCounts> {
        self.by_query
            .get(&[KeyPart::Query(query.to_string())])
            .map(|s| s.counts)
    }

    /// Mean compound score for one query group.
    #[must_use]
    pub fn mean_compound_for_query(&self, query: &str) -> Option<f64> {
        self.by_query
            .get(&[KeyPart::Query(query.to_string())])
            .map(|s| s.mean_compound)
    }
}

/// Compute the by-query, by-(query, source) and by-(date, query) groupings.
///
/// Each grouping is its own pass over `table`; none is derived from another.
#[must_use]
pub fn aggregate(table: &UnifiedTable) -> AggregationResult {
    let result = AggregationResult {
        by_query: group_by(table, &[Dimension::Query]),
        by_query_source: group_by(table, &[Dimension::Query, Dimension::Source]),
        by_date_query: group_by(table, &[Dimension::Date, Dimension::Query]),
    };
    tracing::debug!(
        rows = table.len(),
        queries = result.by_query.len(),
        query_sources = result.by_query_source.len(),
        days = result.by_date_query.len(),
        "aggregated table"
    );
    result
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
