//! Text sanitation applied to every record before scoring.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?]").expect("valid regex"));

static URL_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https\S+|http\S+|www\S+").expect("valid regex"));

/// Sanitize raw post text.
///
/// Strips every character outside word characters, whitespace and `. , ! ?`,
/// drops URL-like tokens (`http…`, `https…`, `www…` up to the next
/// whitespace), collapses whitespace runs to one space and trims the ends.
/// Case and script are left alone.
///
/// Characters are filtered before URLs are removed: filtering can glue the
/// remains of a mangled link back into an `http…` token, and doing it first
/// means a second pass finds nothing left to do.
#[must_use]
pub fn normalize(text: &str) -> String {
    let filtered = DISALLOWED_CHARS.replace_all(text, "");
    let without_urls = URL_TOKENS.replace_all(&filtered, "");
    without_urls.split_whitespace().collect::<Vec<_>>().join(" ")
}
