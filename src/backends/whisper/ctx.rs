use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use super::logging::init_whisper_logging;

/// Load a Whisper model and return an initialized `WhisperContext`.
pub(super) fn get_context(model_path: &str) -> Result<WhisperContext> {
    // Must run before the model loads, which is when whisper.cpp logs the most.
    init_whisper_logging();

    let ctx = WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
        .with_context(|| format!("failed to load model from path: {model_path}"))?;

    Ok(ctx)
}
