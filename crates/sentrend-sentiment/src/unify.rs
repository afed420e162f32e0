//! Record Unifier: normalize → score → categorize → canonical row.

use std::collections::HashMap;

use sentrend_core::{EngineConfig, QueriesFile, RawRecord};

use crate::category::categorize;
use crate::normalize::normalize;
use crate::scorer::{try_score, SentimentSignals};
use crate::types::{ScoredRecord, UnifiedTable};

/// Settings for one unify pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifyConfig {
    /// Minimum normalized text length, in characters.
    pub min_text_len: usize,
    /// Lowercased search term → reporting group.
    pub query_aliases: HashMap<String, String>,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        Self {
            min_text_len: 10,
            query_aliases: HashMap::new(),
        }
    }
}

impl UnifyConfig {
    #[must_use]
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self {
            min_text_len: config.min_text_len,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_queries(mut self, queries: &QueriesFile) -> Self {
        self.query_aliases = queries.alias_map();
        self
    }

    fn resolve_query(&self, term: &str) -> String {
        self.query_aliases
            .get(&term.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| term.trim().to_string())
    }
}

/// Why a record never made it into the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    TextTooShort { len: usize, min: usize },
    MissingField(&'static str),
    /// Input that could not be decoded into a record at all.
    Malformed(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::TextTooShort { len, min } => {
                write!(f, "text too short ({len} < {min} chars)")
            }
            RejectReason::MissingField(field) => write!(f, "missing required field `{field}`"),
            RejectReason::Malformed(reason) => write!(f, "malformed record: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Source-native id when one could be read.
    pub record_id: Option<String>,
    pub reason: RejectReason,
}

/// Bookkeeping for one unify pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifyReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
    /// Accepted rows whose text was unscorable and got zero signals.
    pub degraded: usize,
}

impl UnifyReport {
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Rejection counts keyed by reason kind (`text_too_short`, ...).
    #[must_use]
    pub fn rejected_by_kind(&self) -> Vec<(&'static str, usize)> {
        let mut short = 0;
        let mut missing = 0;
        let mut malformed = 0;
        for rejection in &self.rejected {
            match rejection.reason {
                RejectReason::TextTooShort { .. } => short += 1,
                RejectReason::MissingField(_) => missing += 1,
                RejectReason::Malformed(_) => malformed += 1,
            }
        }
        vec![
            ("text_too_short", short),
            ("missing_field", missing),
            ("malformed", malformed),
        ]
    }

    /// Fold in rejections counted before unification (e.g. undecodable input lines).
    pub fn absorb(&mut self, rejections: impl IntoIterator<Item = Rejection>) {
        self.rejected.extend(rejections);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Unified {
    pub table: UnifiedTable,
    pub report: UnifyReport,
}

fn check_required(record: &RawRecord) -> Result<(), RejectReason> {
    if record.id.trim().is_empty() {
        return Err(RejectReason::MissingField("id"));
    }
    if record.query.trim().is_empty() {
        return Err(RejectReason::MissingField("query"));
    }
    Ok(())
}

/// Turn one raw record into a row, or say why it was rejected.
///
/// The boolean is `true` when the text was unscorable and zero signals were
/// substituted.
fn unify_one(
    record: RawRecord,
    config: &UnifyConfig,
) -> Result<(ScoredRecord, bool), RejectReason> {
    check_required(&record)?;

    let text = normalize(&record.text);
    let len = text.chars().count();
    if len < config.min_text_len {
        return Err(RejectReason::TextTooShort {
            len,
            min: config.min_text_len,
        });
    }

    let (signals, degraded) = match try_score(&text) {
        Some(signals) => (signals, false),
        None => (SentimentSignals::zero(), true),
    };

    let row = ScoredRecord {
        query: config.resolve_query(&record.query),
        search_term: record.query,
        source: record.source,
        id: record.id,
        text,
        author: record.author,
        created_at: record.created_at,
        category: categorize(signals.compound),
        signals,
        metrics: record.metrics,
    };
    Ok((row, degraded))
}

/// Build the unified table from a batch of collector records.
///
/// A bad record is counted in the report and skipped; it never stops the
/// rest of the batch.
pub fn unify<I>(records: I, config: &UnifyConfig) -> Unified
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut rows = Vec::new();
    let mut report = UnifyReport::default();

    for record in records {
        let record_id = record.id.clone();
        match unify_one(record, config) {
            Ok((row, degraded)) => {
                if degraded {
                    tracing::warn!(
                        id = %row.id,
                        source = %row.source,
                        "text has nothing scorable; substituting neutral signals"
                    );
                    report.degraded += 1;
                }
                rows.push(row);
            }
            Err(reason) => {
                tracing::debug!(id = %record_id, %reason, "record rejected");
                report.rejected.push(Rejection {
                    record_id: Some(record_id).filter(|id| !id.trim().is_empty()),
                    reason,
                });
            }
        }
    }

    report.accepted = rows.len();
    tracing::info!(
        accepted = report.accepted,
        rejected = report.rejected_count(),
        degraded = report.degraded,
        "unified records"
    );

    Unified {
        table: UnifiedTable::new(rows),
        report,
    }
}

#[cfg(test)]
#[path = "unify_test.rs"]
mod tests;
