use serde::{Deserialize, Serialize};

/// A single recognized word with its timing in the re-recorded audio.
///
/// Deserializes from whisper-style JSON, where the text field is called `word`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text as recognized, possibly with punctuation attached.
    #[serde(rename = "word", alias = "text")]
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Convert whisper centisecond timestamps to seconds, clamping whisper's `-1` "unknown" to zero.
#[cfg(feature = "whisper")]
pub(crate) fn centiseconds_to_seconds(value: i64) -> f64 {
    if value < 0 { 0.0 } else { value as f64 / 100.0 }
}
