use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Calibration knobs for one alignment run.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for layering a config file and flags on top of
/// [`AlignOpts::default`] so that other frontends (tests, batch jobs) can construct
/// options programmatically.
///
/// Every value here is a calibration choice rather than an algorithmic necessity, which is
/// why none of them are hard-coded in the matcher or reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignOpts {
    /// A span only counts as a match when its similarity ratio is strictly above this value.
    ///
    /// The default is deliberately low: any weak signal beats the proportional fallback.
    pub similarity_threshold: f64,

    /// Minimum silence between the end of one cue and the start of the next (seconds).
    pub min_gap_seconds: f64,

    /// Padding added on top of the estimated spoken duration of every cue (seconds).
    pub buffer_seconds: f64,

    /// Spoken-duration estimate per normalized character when no span of the transcript
    /// matches a cue's text.
    pub fallback_seconds_per_char: f64,

    /// Reading-time floor per normalized character.
    pub base_seconds_per_char: f64,

    /// Longest word span the duration estimator considers.
    pub max_duration_span_words: usize,

    /// How many cues' worth of average pacing the positional search looks ahead.
    pub lookahead_factor: f64,
}

impl Default for AlignOpts {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.2,
            min_gap_seconds: 0.05,
            buffer_seconds: 0.4,
            fallback_seconds_per_char: 0.3,
            base_seconds_per_char: 0.06,
            max_duration_span_words: 19,
            lookahead_factor: 2.0,
        }
    }
}

impl AlignOpts {
    /// Reject values that would break the output invariants (positive duration, ordering).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.similarity_threshold) {
            return Err(Error::config(format!(
                "similarity_threshold must be in [0, 1), got {}",
                self.similarity_threshold
            )));
        }

        // The buffer is what keeps `end > start` for cues with no measurable speech.
        if !(self.buffer_seconds.is_finite() && self.buffer_seconds > 0.0) {
            return Err(Error::config(format!(
                "buffer_seconds must be positive, got {}",
                self.buffer_seconds
            )));
        }

        for (name, value) in [
            ("min_gap_seconds", self.min_gap_seconds),
            ("fallback_seconds_per_char", self.fallback_seconds_per_char),
            ("base_seconds_per_char", self.base_seconds_per_char),
            ("lookahead_factor", self.lookahead_factor),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.max_duration_span_words == 0 {
            return Err(Error::config("max_duration_span_words must be at least 1"));
        }

        Ok(())
    }
}

/// Options for the audio preprocessing step that runs before transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOpts {
    /// Whether to peak-normalize the decoded samples.
    pub normalize_level: bool,

    /// Target absolute peak after normalization, in `(0, 1]`.
    pub target_peak: f32,
}

impl Default for AudioOpts {
    fn default() -> Self {
        Self {
            normalize_level: true,
            // Roughly -1 dBFS.
            target_peak: 0.89,
        }
    }
}

impl AudioOpts {
    pub fn validate(&self) -> Result<()> {
        if !(self.target_peak > 0.0 && self.target_peak <= 1.0) {
            return Err(Error::config(format!(
                "target_peak must be in (0, 1], got {}",
                self.target_peak
            )));
        }
        Ok(())
    }
}
