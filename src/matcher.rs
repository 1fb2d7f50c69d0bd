//! Positional fuzzy matching of one cue against a window of recognized words.

use std::ops::Range;

use crate::normalize::normalize;
use crate::similarity::Reference;
use crate::word::Word;

/// Transcript words alongside their normalized text, computed once per run.
#[derive(Debug, Clone)]
pub struct NormalizedWords<'a> {
    words: &'a [Word],
    normalized: Vec<String>,
}

impl<'a> NormalizedWords<'a> {
    pub fn new(words: &'a [Word]) -> Self {
        let normalized = words.iter().map(|w| normalize(&w.text)).collect();
        Self { words, normalized }
    }

    pub fn words(&self) -> &'a [Word] {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Normalized text of `words[range]`, joined by single spaces.
    pub fn span_text(&self, range: Range<usize>) -> String {
        self.normalized[range].join(" ")
    }

    pub(crate) fn normalized(&self, idx: usize) -> &str {
        &self.normalized[idx]
    }
}

/// A span of words and how well it matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanMatch {
    /// First word of the span.
    pub start: usize,
    /// One past the last word of the span.
    pub end: usize,
    pub ratio: f64,
}

/// Score every `cue_words`-long span starting inside `window` and return the best one.
///
/// Spans that would run past the transcript are truncated. The earliest span wins ties.
/// Returns `None` when no span scores above zero.
pub fn best_span(
    reference: &Reference,
    cue_words: usize,
    words: &NormalizedWords<'_>,
    window: Range<usize>,
) -> Option<SpanMatch> {
    if cue_words == 0 {
        return None;
    }

    let mut best: Option<SpanMatch> = None;
    for start in window.start..window.end.min(words.len()) {
        let end = (start + cue_words).min(words.len());
        let floor = best.map_or(0.0, |b| b.ratio);

        if let Some(ratio) = reference.ratio_above(&words.span_text(start..end), floor) {
            best = Some(SpanMatch { start, end, ratio });
        }
    }
    best
}

/// [`best_span`], accepted only when its ratio is strictly above `threshold`.
pub fn find_match(
    reference: &Reference,
    cue_words: usize,
    words: &NormalizedWords<'_>,
    window: Range<usize>,
    threshold: f64,
) -> Option<SpanMatch> {
    best_span(reference, cue_words, words, window)
        .filter(|m| m.ratio > threshold)
}
