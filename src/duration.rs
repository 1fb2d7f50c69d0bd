//! Spoken-duration estimation.
//!
//! Independent of where a cue matched positionally, we look across the whole transcript for
//! the short word span that reads most like the cue and take its duration. This lets a cue keep
//! a confident duration even when its positional search window missed.

use crate::matcher::NormalizedWords;
use crate::opts::AlignOpts;
use crate::similarity::Reference;

/// Estimated spoken duration of `reference` (a cue's normalized text), in seconds.
///
/// Every span of 1 to `max_duration_span_words` consecutive words is a candidate. The best span
/// is used when its ratio is strictly above the similarity threshold and it has a positive
/// duration. Otherwise the estimate is `fallback_seconds_per_char` per normalized character.
pub fn estimate_speech_duration(
    reference: &Reference,
    words: &NormalizedWords<'_>,
    opts: &AlignOpts,
) -> f64 {
    let fallback = reference.len() as f64 * opts.fallback_seconds_per_char;
    if reference.is_empty() {
        return fallback;
    }

    let all = words.words();
    let mut best_ratio = 0.0;
    let mut best_duration: Option<f64> = None;

    for first in 0..words.len() {
        let last_exclusive = (first + opts.max_duration_span_words).min(words.len());
        let mut candidate = String::new();

        for end in first + 1..=last_exclusive {
            if end > first + 1 {
                candidate.push(' ');
            }
            candidate.push_str(words.normalized(end - 1));

            if let Some(ratio) = reference.ratio_above(&candidate, best_ratio) {
                best_ratio = ratio;
                best_duration = Some(all[end - 1].end - all[first].start);
            }
        }
    }

    match best_duration {
        Some(duration) if best_ratio > opts.similarity_threshold && duration > 0.0 => duration,
        _ => fallback,
    }
}
