//! Dual-model scorer: lexical polarity/subjectivity plus rule-based valence.
//!
//! The two models are independent. Their outputs are carried side by side
//! and never blended; only the valence model's compound score feeds the
//! categorizer.

use serde::{Deserialize, Serialize};

use crate::polarity::polarity_subjectivity;
use crate::vader::valence_scores;

/// Both models' outputs for one text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSignals {
    /// Lexical model, `[-1, 1]`.
    pub polarity: f64,
    /// Lexical model, `[0, 1]`. Not used for labeling.
    pub subjectivity: f64,
    /// Valence model proportions, each `[0, 1]`; not guaranteed to sum to 1.
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Valence model, `[-1, 1]`.
    pub compound: f64,
}

impl SentimentSignals {
    /// The all-zero signal set substituted for unscorable text.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Score `text`, or `None` if it holds nothing scorable (no letter or digit).
#[must_use]
pub fn try_score(text: &str) -> Option<SentimentSignals> {
    if !text.chars().any(char::is_alphanumeric) {
        return None;
    }

    let (polarity, subjectivity) = polarity_subjectivity(text);
    let valence = valence_scores(text);

    Some(SentimentSignals {
        polarity,
        subjectivity,
        positive: valence.positive,
        negative: valence.negative,
        neutral: valence.neutral,
        compound: valence.compound,
    })
}

/// Score `text`, substituting [`SentimentSignals::zero`] for unscorable input.
#[must_use]
pub fn score(text: &str) -> SentimentSignals {
    try_score(text).unwrap_or_else(SentimentSignals::zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{categorize, SentimentCategory};

    #[test]
    fn whitespace_only_is_unscorable_and_neutral() {
        assert!(try_score("   ").is_none());
        let signals = score("   ");
        assert_eq!(signals, SentimentSignals::zero());
        assert!((-0.05..=0.05).contains(&signals.compound));
        assert_eq!(categorize(signals.compound), SentimentCategory::Neutral);
    }

    #[test]
    fn punctuation_only_is_unscorable() {
        assert!(try_score("...!!??,,").is_none());
        assert_eq!(score("...!!??,,"), SentimentSignals::zero());
    }

    #[test]
    fn positive_text_has_positive_signals() {
        let s = score("What a wonderful and beautiful city, I love it!");
        assert!(s.compound > 0.05);
        assert!(s.polarity > 0.0);
        assert!(s.subjectivity > 0.0);
        assert!(s.positive > s.negative);
    }

    #[test]
    fn negative_text_has_negative_compound() {
        let s = score("The service was terrible and the staff were rude");
        assert!(s.compound < -0.05);
        assert!(s.polarity < 0.0);
    }

    #[test]
    fn models_can_disagree_in_sign() {
        // "expensive" is only known to the lexical model.
        let s = score("expensive but free parking");
        assert!(s.compound > 0.0, "compound {}", s.compound);
        assert!(s.polarity < 0.0, "polarity {}", s.polarity);
    }

    #[test]
    fn factual_text_is_neutral() {
        let s = score("The meeting starts at nine in the main hall");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.polarity, 0.0);
        assert_eq!(s.subjectivity, 0.0);
        assert_eq!(s.neutral, 1.0);
    }

    #[test]
    fn ranges_hold() {
        for text in [
            "BEST day EVER!!!!",
            "worst worst worst terrible",
            "not bad at all",
            "ok",
        ] {
            let s = score(text);
            assert!((-1.0..=1.0).contains(&s.polarity));
            assert!((0.0..=1.0).contains(&s.subjectivity));
            assert!((-1.0..=1.0).contains(&s.compound));
            for v in [s.positive, s.negative, s.neutral] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
