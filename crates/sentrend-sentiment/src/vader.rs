//! Rule-based valence model in the style of VADER.
//!
//! Word valences live in `[-4, 4]`. Boosters, ALL-CAPS emphasis, negation,
//! the "but" contrast and `!`/`?` emphasis adjust them, and the summed
//! valence is squashed into the compound score with
//! `s / sqrt(s² + ALPHA)`.

/// Word → mean valence rating in `[-4, 4]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("agree", 1.5),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("celebrate", 2.7),
    ("clean", 1.7),
    ("cool", 1.3),
    ("enjoy", 2.2),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fantastic", 2.6),
    ("favorite", 2.0),
    ("free", 2.3),
    ("friendly", 2.2),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("growth", 1.6),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("impressive", 2.3),
    ("interesting", 1.7),
    ("kind", 2.4),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("opportunity", 1.8),
    ("peace", 2.5),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("proud", 2.1),
    ("recommend", 1.5),
    ("rich", 2.6),
    ("safe", 1.9),
    ("smart", 1.7),
    ("strong", 2.3),
    ("success", 2.7),
    ("support", 1.7),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("welcome", 2.0),
    ("win", 2.8),
    ("winning", 2.4),
    ("won", 2.7),
    ("wonderful", 2.7),
    ("yes", 1.7),
    // Negative
    ("abuse", -3.2),
    ("afraid", -2.0),
    ("angry", -2.3),
    ("annoying", -1.7),
    ("attack", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("ban", -2.6),
    ("banned", -2.0),
    ("boring", -1.3),
    ("corrupt", -3.0),
    ("corruption", -1.9),
    ("crime", -2.5),
    ("criminal", -2.4),
    ("crisis", -3.1),
    ("cruel", -2.8),
    ("damn", -1.7),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("dead", -3.3),
    ("death", -2.9),
    ("disaster", -3.1),
    ("disgusting", -2.4),
    ("dislike", -1.6),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fake", -2.1),
    ("fear", -2.2),
    ("hate", -2.7),
    ("hell", -3.6),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("illegal", -2.6),
    ("kill", -3.7),
    ("killed", -3.5),
    ("lie", -1.6),
    ("lies", -1.8),
    ("loss", -1.3),
    ("lost", -1.3),
    ("pain", -2.3),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("protest", -1.0),
    ("racist", -3.1),
    ("sad", -2.1),
    ("scam", -2.6),
    ("shame", -2.1),
    ("slavery", -3.8),
    ("stupid", -2.4),
    ("suffer", -2.2),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("threat", -2.4),
    ("ugly", -2.3),
    ("unfair", -2.1),
    ("violence", -3.1),
    ("war", -2.9),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const ALPHA: f64 = 15.0;

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR),
    ("completely", B_INCR),
    ("deeply", B_INCR),
    ("especially", B_INCR),
    ("extremely", B_INCR),
    ("fully", B_INCR),
    ("greatly", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredibly", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("totally", B_INCR),
    ("truly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("less", B_DECR),
    ("marginally", B_DECR),
    ("partly", B_DECR),
    ("scarcely", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "neither", "never", "none", "nope", "nor", "not", "nothing", "nowhere",
    "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

/// The four valence-model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ValenceScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub compound: f64,
}

fn valence(word: &str) -> Option<f64> {
    LEXICON.iter().find(|&&(w, _)| w == word).map(|&(_, v)| v)
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS.iter().find(|&&(w, _)| w == word).map(|&(_, v)| v)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

/// Booster contribution of `token` to a neighbouring word with `valence`.
fn scalar_inc_dec(token: &str, lower: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(lower) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(token) {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

#[allow(clippy::cast_precision_loss)]
fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.chars().filter(|&c| c == '!').count().min(4);
    let questions = text.chars().filter(|&c| c == '?').count();
    let ep = exclamations as f64 * 0.292;
    let qm = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    ep + qm
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Score `text`. Returns all zeros when there is nothing to score.
pub(crate) fn valence_scores(text: &str) -> ValenceScores {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    if tokens.is_empty() {
        return ValenceScores::default();
    }
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    let cap_diff = caps > 0 && caps < tokens.len();

    let mut sentiments: Vec<f64> = Vec::with_capacity(tokens.len());
    for (i, lower) in lowered.iter().enumerate() {
        if booster(lower).is_some() {
            sentiments.push(0.0);
            continue;
        }
        let Some(mut v) = valence(lower) else {
            sentiments.push(0.0);
            continue;
        };

        if cap_diff && is_all_caps(tokens[i]) {
            if v > 0.0 {
                v += C_INCR;
            } else {
                v -= C_INCR;
            }
        }

        for distance in 1..=3_usize {
            let Some(j) = i.checked_sub(distance) else {
                break;
            };
            if valence(&lowered[j]).is_none() {
                let mut s = scalar_inc_dec(tokens[j], &lowered[j], v, cap_diff);
                if distance == 2 {
                    s *= 0.95;
                } else if distance == 3 {
                    s *= 0.9;
                }
                v += s;
            }
            if is_negation(&lowered[j]) {
                v *= N_SCALAR;
            }
        }

        sentiments.push(v);
    }

    // "but" shifts weight towards the clause after it.
    if let Some(but_idx) = lowered.iter().position(|w| w == "but") {
        for (i, s) in sentiments.iter_mut().enumerate() {
            if i < but_idx {
                *s *= 0.5;
            } else if i > but_idx {
                *s *= 1.5;
            }
        }
    }

    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in &sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    if total <= 0.0 {
        return ValenceScores::default();
    }

    ValenceScores {
        positive: round_to((pos_sum / total).abs(), 3),
        negative: round_to((neg_sum / total).abs(), 3),
        neutral: round_to((neu_count / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
