//! `cuesync` re-times an existing subtitle file against a new recording of the same speech.
//!
//! This crate provides:
//! - SubRip parsing with overlap separation
//! - Transcript ingest (from a recognizer or a saved JSON transcript)
//! - Fuzzy positional matching of cue text against recognized words
//! - Timeline reconciliation with gap, duration and fallback guarantees
//! - Pluggable output encoders (SRT, VTT, JSON)
//!
//! Most callers start with [`Aligner`], or [`align_with_transcript`] when a transcript is
//! already available. The lower-level pieces are public so they can be tested and reused on
//! their own.

// High-level API (most consumers should start here).
pub mod aligner;
pub mod opts;

// Errors.
pub mod error;

// Subtitle input.
pub mod cue;
pub mod srt;

// Transcripts and speech recognition.
pub mod backends;
pub mod token;
pub mod transcriber;
pub mod transcript;
pub mod word;

// Audio preprocessing.
pub mod audio;

// Matching and reconciliation.
pub mod duration;
pub mod matcher;
pub mod normalize;
pub mod reconcile;
pub mod similarity;
pub mod window;

// Output selection and encoder interfaces.
pub mod cue_encoder;
pub mod output_type;

// Output encoders that serialize aligned cues into various formats.
pub mod json_array_encoder;
pub mod srt_encoder;
pub mod vtt_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use aligner::{Aligner, Run, align_with_transcript, encode_cues, write_output};
pub use cue::{AlignedCue, SourceCue};
pub use error::{Error, Result};
pub use opts::{AlignOpts, AudioOpts};
pub use output_type::OutputType;
pub use reconcile::{Alignment, CueDecision, Placement, align};
pub use transcriber::Transcriber;
pub use transcript::{Transcript, TranscriptSegment};
pub use word::Word;

#[cfg(feature = "whisper")]
pub use backends::whisper::WhisperTranscriber;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
