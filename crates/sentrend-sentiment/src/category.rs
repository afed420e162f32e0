//! Compound score → sentiment label.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the positive band.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Upper bound (inclusive) of the negative band.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Discrete sentiment label.
///
/// Ordered `Negative < Neutral < Positive`, which is also the column order
/// used in exported contingency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
        SentimentCategory::Positive,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Positive => "Positive",
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label a compound score.
///
/// `>= 0.05` is positive, `<= -0.05` is negative, anything strictly between
/// is neutral. This is the only place labels are derived.
#[must_use]
pub fn categorize(compound: f64) -> SentimentCategory {
    if compound >= POSITIVE_THRESHOLD {
        SentimentCategory::Positive
    } else if compound <= NEGATIVE_THRESHOLD {
        SentimentCategory::Negative
    } else {
        SentimentCategory::Neutral
    }
}
