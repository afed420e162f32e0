//! Fixture builders shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};
use sentrend_core::{MetricBag, MetricValue, RawRecord, Source};

use crate::category::categorize;
use crate::scorer::SentimentSignals;
use crate::types::{ScoredRecord, UnifiedTable};

pub(crate) fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub(crate) fn raw(source: Source, id: &str, text: &str, query: &str) -> RawRecord {
    RawRecord {
        source,
        id: id.to_string(),
        text: text.to_string(),
        author: "tester".to_string(),
        created_at: at(2024, 3, 1, 12),
        metrics: MetricBag::new(),
        query: query.to_string(),
    }
}

pub(crate) fn metrics(pairs: &[(&str, MetricValue)]) -> MetricBag {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// A row with a fixed compound score; the other signals are zero.
pub(crate) fn row(
    source: Source,
    query: &str,
    created_at: DateTime<Utc>,
    compound: f64,
) -> ScoredRecord {
    let signals = SentimentSignals {
        compound,
        ..SentimentSignals::zero()
    };
    ScoredRecord {
        source,
        id: format!("{query}-{}-{compound}", created_at.timestamp()),
        text: "fixture text body".to_string(),
        author: "tester".to_string(),
        created_at,
        query: query.to_string(),
        search_term: query.to_string(),
        signals,
        category: categorize(compound),
        metrics: MetricBag::new(),
    }
}

pub(crate) fn table(rows: Vec<ScoredRecord>) -> UnifiedTable {
    UnifiedTable::new(rows)
}
