use serde::Serialize;

/// A cue as authored against the reference recording.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCue {
    /// Index as written in the source file. Informational only; output is renumbered.
    pub index: usize,
    /// Display text, with multiple lines joined by `\n`.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// `end - start`, kept in sync whenever either bound moves.
    pub duration: f64,
}

impl SourceCue {
    pub fn new(index: usize, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            index,
            text: text.into(),
            start,
            end,
            duration: end - start,
        }
    }
}

/// A cue re-timed against the new speech track. `end > start` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedCue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Stable chronological sort used wherever cues are (re-)ordered.
pub(crate) fn sort_by_start<T>(items: &mut [T], start: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| start(a).total_cmp(&start(b)));
}
