//! Lexical polarity/subjectivity model.
//!
//! Each known word carries a `(polarity, subjectivity)` pair. Intensifying
//! adverbs scale the next assessed word, and a negation in the two tokens
//! before a word flips and halves its polarity. The text's polarity and
//! subjectivity are the means over the assessed words.

/// Word → (polarity in `[-1, 1]`, subjectivity in `[0, 1]`).
pub(crate) const LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("awesome", 1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.667),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("broken", -0.4, 0.4),
    ("cheap", 0.4, 0.7),
    ("clean", 0.367, 0.683),
    ("cool", 0.35, 0.65),
    ("corrupt", -0.5, 0.5),
    ("crazy", -0.6, 0.9),
    ("cruel", -1.0, 1.0),
    ("dangerous", -0.6, 0.9),
    ("dirty", -0.6, 0.8),
    ("disappointing", -0.6, 0.7),
    ("disgusting", -1.0, 1.0),
    ("easy", 0.433, 0.833),
    ("excellent", 1.0, 1.0),
    ("expensive", -0.5, 0.7),
    ("fake", -0.5, 1.0),
    ("false", -0.4, 0.7),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.417, 0.5),
    ("free", 0.4, 0.8),
    ("friendly", 0.375, 0.5),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hard", -0.292, 0.542),
    ("hate", -0.8, 0.9),
    ("helpful", 0.6, 0.5),
    ("honest", 0.6, 0.9),
    ("horrible", -1.0, 1.0),
    ("huge", 0.4, 0.9),
    ("illegal", -0.5, 0.5),
    ("important", 0.4, 1.0),
    ("impressive", 1.0, 1.0),
    ("interesting", 0.5, 0.5),
    ("kind", 0.6, 0.9),
    ("lovely", 0.5, 0.75),
    ("love", 0.5, 0.6),
    ("nice", 0.6, 1.0),
    ("perfect", 1.0, 1.0),
    ("pleasant", 0.733, 0.967),
    ("poor", -0.4, 0.6),
    ("proud", 0.8, 1.0),
    ("rich", 0.375, 0.5),
    ("ridiculous", -0.333, 1.0),
    ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5),
    ("scary", -0.5, 1.0),
    ("serious", -0.333, 0.667),
    ("stupid", -0.8, 1.0),
    ("strong", 0.433, 0.733),
    ("terrible", -1.0, 1.0),
    ("true", 0.35, 0.65),
    ("ugly", -0.7, 1.0),
    ("unfair", -0.5, 0.9),
    ("useless", -0.5, 0.2),
    ("weak", -0.375, 0.625),
    ("weird", -0.5, 1.0),
    ("wonderful", 1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

/// Adverb → multiplier applied to the next assessed word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("most", 1.4),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.3),
    ("totally", 1.4),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "dont", "isnt", "wasnt", "arent", "cant"];

const NEGATION_SCALAR: f64 = -0.5;

fn lookup(word: &str) -> Option<(f64, f64)> {
    LEXICON
        .iter()
        .find(|&&(w, _, _)| w == word)
        .map(|&(_, p, s)| (p, s))
}

fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|&&(w, _)| w == word)
        .map(|&(_, m)| m)
}

/// Score `text` and return `(polarity, subjectivity)`.
///
/// Returns `(0.0, 0.0)` when no lexicon word is present.
#[must_use]
pub(crate) fn polarity_subjectivity(text: &str) -> (f64, f64) {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut polarity_sum = 0.0;
    let mut subjectivity_sum = 0.0;
    let mut assessed = 0_u32;

    for (i, word) in words.iter().enumerate() {
        let Some((mut polarity, mut subjectivity)) = lookup(word) else {
            continue;
        };

        if let Some(multiplier) = i.checked_sub(1).and_then(|j| intensity(&words[j])) {
            polarity *= multiplier;
            subjectivity *= multiplier;
        }

        let window_start = i.saturating_sub(2);
        if words[window_start..i]
            .iter()
            .any(|w| NEGATIONS.contains(&w.as_str()))
        {
            polarity *= NEGATION_SCALAR;
        }

        polarity_sum += polarity.clamp(-1.0, 1.0);
        subjectivity_sum += subjectivity.clamp(0.0, 1.0);
        assessed += 1;
    }

    if assessed == 0 {
        return (0.0, 0.0);
    }

    let n = f64::from(assessed);
    (
        (polarity_sum / n).clamp(-1.0, 1.0),
        (subjectivity_sum / n).clamp(0.0, 1.0),
    )
}
