use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Platform a record was harvested from.
///
/// The well-known platforms get their own variant; anything else a future
/// collector emits is carried as [`Source::Other`] with its label verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Source {
    Reddit,
    Bluesky,
    YouTube,
    Other(String),
}

impl Source {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Source::Reddit => "Reddit",
            Source::Bluesky => "Bluesky",
            Source::YouTube => "YouTube",
            Source::Other(label) => label,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("source label must be non-empty".to_string());
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "reddit" => Source::Reddit,
            "bluesky" => Source::Bluesky,
            "youtube" => Source::YouTube,
            _ => Source::Other(trimmed.to_string()),
        })
    }
}

impl TryFrom<String> for Source {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.as_str().to_string()
    }
}

/// One source-specific metric value (`like_count`, `subreddit`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Returns the string payload for [`MetricValue::Text`], `None` otherwise.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Bool(b) => write!(f, "{b}"),
            MetricValue::Int(i) => write!(f, "{i}"),
            MetricValue::Float(x) => write!(f, "{x}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// Open side mapping of per-source metrics, ordered by key.
pub type MetricBag = BTreeMap<String, MetricValue>;

/// A text record as handed over by a collector.
///
/// Collectors own authentication, paging and the first no-empty-text filter;
/// the engine re-validates on its side of the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub source: Source,
    /// Platform-native identifier (post id, comment id, AT URI).
    pub id: String,
    pub text: String,
    pub author: String,
    /// Creation time. Accepts RFC 3339 with any offset or integer Unix seconds.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "source_specific_metrics", default)]
    pub metrics: MetricBag,
    /// Search query that produced the record.
    pub query: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Unix(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match TimestampRepr::deserialize(deserializer)? {
        TimestampRepr::Unix(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| D::Error::custom(format!("unix timestamp out of range: {secs}"))),
        TimestampRepr::Text(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}"))),
    }
}
