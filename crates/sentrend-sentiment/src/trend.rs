//! Daily mean compound score per query and its trailing rolling mean.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::{group_by, Dimension, KeyPart};
use crate::types::UnifiedTable;

/// Default trailing window, in points.
pub const DEFAULT_WINDOW: usize = 7;

/// How days without any record are treated by the rolling window.
///
/// Neither policy synthesizes values for missing days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapPolicy {
    /// The window spans the last `window` observed days, however far apart.
    /// Sparse series therefore average over a longer stretch of time.
    #[default]
    Skip,
    /// The window spans the last `window` calendar days ending at the point;
    /// missing days simply contribute nothing.
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Daily and rolling series for one query, both in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTrend {
    pub daily: Vec<TrendPoint>,
    pub rolling: Vec<TrendPoint>,
}

impl QueryTrend {
    /// Most recent rolling value.
    #[must_use]
    pub fn latest_rolling(&self) -> Option<TrendPoint> {
        self.rolling.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub window: usize,
    pub gap_policy: GapPolicy,
    pub queries: BTreeMap<String, QueryTrend>,
}

impl TrendSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    #[must_use]
    pub fn get(&self, query: &str) -> Option<&QueryTrend> {
        self.queries.get(query)
    }
}

/// Trailing mean over the last `window` values with a minimum period of one.
///
/// A `window` of zero is treated as one.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            #[allow(clippy::cast_precision_loss)]
            let n = slice.len() as f64;
            slice.iter().sum::<f64>() / n
        })
        .collect()
}

/// Calendar-window variant of [`rolling_mean`] over dated points.
fn rolling_mean_calendar(points: &[TrendPoint], window: usize) -> Vec<f64> {
    let span = i64::try_from(window.max(1)).unwrap_or(i64::MAX);
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let in_window: Vec<f64> = points[..=i]
                .iter()
                .filter(|p| (point.date - p.date).num_days() < span)
                .map(|p| p.value)
                .collect();
            #[allow(clippy::cast_precision_loss)]
            let n = in_window.len() as f64;
            in_window.iter().sum::<f64>() / n
        })
        .collect()
}

/// Per-query daily means and their rolling mean, skipping missing days.
#[must_use]
pub fn trend(table: &UnifiedTable, window: usize) -> TrendSeries {
    trend_with_policy(table, window, GapPolicy::Skip)
}

/// Like [`trend`], with an explicit [`GapPolicy`].
///
/// Recomputed from scratch on every call; each query's series is rolled
/// independently.
#[must_use]
pub fn trend_with_policy(table: &UnifiedTable, window: usize, gap_policy: GapPolicy) -> TrendSeries {
    let daily_means = group_by(table, &[Dimension::Query, Dimension::Date]);

    let mut daily_by_query: BTreeMap<String, Vec<TrendPoint>> = BTreeMap::new();
    for (key, stats) in daily_means.iter() {
        if let [KeyPart::Query(query), KeyPart::Date(date)] = key.as_slice() {
            daily_by_query
                .entry(query.clone())
                .or_default()
                .push(TrendPoint {
                    date: *date,
                    value: stats.mean_compound,
                });
        }
    }

    let queries = daily_by_query
        .into_iter()
        .map(|(query, daily)| {
            let rolled = match gap_policy {
                GapPolicy::Skip => {
                    let values: Vec<f64> = daily.iter().map(|p| p.value).collect();
                    rolling_mean(&values, window)
                }
                GapPolicy::Calendar => rolling_mean_calendar(&daily, window),
            };
            let rolling = daily
                .iter()
                .zip(rolled)
                .map(|(p, value)| TrendPoint {
                    date: p.date,
                    value,
                })
                .collect();
            (query, QueryTrend { daily, rolling })
        })
        .collect();

    TrendSeries {
        window: window.max(1),
        gap_policy,
        queries,
    }
}
