//! Comparison-only text normalization.
//!
//! Subtitle text and recognized words go through the exact same transform so similarity scores
//! are symmetric. The normalized form is never written back out.

use std::sync::LazyLock;

use regex::Regex;

// `\w` and `\s` are Unicode-aware in `regex`, so accented and non-Latin letters survive.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("invalid normalization regex"));

/// Lower-case `text` and strip every character that is neither a word character nor whitespace.
pub fn normalize(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Join the words of `text` with single spaces, so line breaks and runs of spaces compare like the
/// space between two transcript words.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words in already-normalized text.
pub fn word_count(normalized: &str) -> usize {
    normalized.split_whitespace().count()
}
