//! Ratcliff/Obershelp similarity over characters.
//!
//! The score is `2 * M / T`, where `T` is the total number of characters in both strings and
//! `M` the number of characters covered by the matching blocks found by repeatedly taking the
//! longest common substring and recursing on both sides of it. Ties between equally long
//! substrings go to the one that starts earliest in the first string, then the second, which
//! keeps the result deterministic.
//!
//! Many candidates are scored against the same reference text, so [`Reference`] keeps the
//! reference's characters and character histogram around and offers cheap upper bounds that let
//! callers skip candidates that cannot beat the best score seen so far.

use std::collections::HashMap;

/// Similarity of two strings in `[0, 1]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    Reference::new(a).ratio(b)
}

/// A reference text prepared for repeated scoring.
#[derive(Debug, Clone)]
pub struct Reference {
    chars: Vec<char>,
    histogram: HashMap<char, usize>,
}

impl Reference {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut histogram = HashMap::new();
        for &c in &chars {
            *histogram.entry(c).or_insert(0) += 1;
        }
        Self { chars, histogram }
    }

    /// Length of the reference in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Full similarity score against `candidate`.
    pub fn ratio(&self, candidate: &str) -> f64 {
        let candidate: Vec<char> = candidate.chars().collect();
        let matched = matched_chars(&self.chars, &candidate);
        score(matched, self.chars.len() + candidate.len())
    }

    /// Score `candidate` only if it can end up strictly above `floor`.
    ///
    /// Two upper bounds are tried before the full computation: the length bound
    /// (`M <= min(len_a, len_b)`) and the histogram bound (`M` never exceeds the size of the
    /// character multiset intersection). Both use the same `2 * M / T` arithmetic as the real
    /// score, so a skipped candidate could never have compared greater than `floor`.
    pub fn ratio_above(&self, candidate: &str, floor: f64) -> Option<f64> {
        let candidate: Vec<char> = candidate.chars().collect();
        let total = self.chars.len() + candidate.len();

        let length_bound = self.chars.len().min(candidate.len());
        if score(length_bound, total) <= floor {
            return None;
        }

        if score(self.shared_chars(&candidate), total) <= floor {
            return None;
        }

        let ratio = score(matched_chars(&self.chars, &candidate), total);
        (ratio > floor).then_some(ratio)
    }

    fn shared_chars(&self, candidate: &[char]) -> usize {
        let mut remaining: HashMap<char, usize> = HashMap::with_capacity(self.histogram.len());
        let mut shared = 0;
        for c in candidate {
            let left = remaining
                .entry(*c)
                .or_insert_with(|| self.histogram.get(c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                shared += 1;
            }
        }
        shared
    }
}

fn score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matched as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]` as `(start_a, start_b, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

    // `prev[j + 1]` is the length of the common suffix ending at a[i - 1], b[j].
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let len = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            cur[j + 1] = len;
            if len > best_len {
                best_i = i + 1 - len;
                best_j = j + 1 - len;
                best_len = len;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_len)
}
