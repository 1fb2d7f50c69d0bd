use whisper_rs::WhisperContext;

use crate::transcriber::Transcriber;
use crate::transcript::TranscriptSegment;
use crate::{Error, Result};

mod ctx;
mod logging;
mod segments;

/// Built-in transcriber powered by `whisper-rs` / `whisper.cpp`, with word-level timings.
pub struct WhisperTranscriber {
    /// Loaded model; states are created from it per call.
    ctx: WhisperContext,

    /// Language hint passed to whisper; `None` means auto-detect.
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Load a whisper.cpp model (e.g. `ggml-base.bin`) from disk.
    pub fn new(model_path: &str) -> Result<Self> {
        if model_path.trim().is_empty() {
            return Err(Error::config("model path must be provided"));
        }
        let ctx = ctx::get_context(model_path)?;
        Ok(Self {
            ctx,
            language: None,
        })
    }

    /// Language hint such as `"en"`. `None` lets whisper auto-detect.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&mut self, samples_16k_mono: &[f32]) -> Result<Vec<TranscriptSegment>> {
        // whisper rejects an empty buffer; nothing was said either way.
        if samples_16k_mono.is_empty() {
            return Ok(Vec::new());
        }

        let segments =
            segments::transcribe_segments(&self.ctx, self.language.as_deref(), samples_16k_mono)?;
        tracing::debug!(segments = segments.len(), "whisper transcription finished");
        Ok(segments)
    }
}
