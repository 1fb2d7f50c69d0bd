use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment, WhisperState};

use crate::token::{Token, group_into_words};
use crate::transcript::TranscriptSegment;
use crate::word::centiseconds_to_seconds;

/// Run whisper over `samples` and convert every segment it reports.
pub(super) fn transcribe_segments(
    ctx: &WhisperContext,
    language: Option<&str>,
    samples: &[f32],
) -> Result<Vec<TranscriptSegment>> {
    let state = run_whisper_full(ctx, language, samples)?;
    state
        .as_iter()
        .map(|segment| to_segment(&segment))
        .collect()
}

fn to_segment(segment: &WhisperSegment) -> Result<TranscriptSegment> {
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    // Tokens carry the timings; the segment text is kept only for saved transcripts.
    let tokens = tokens_from_segment(segment)?;

    Ok(TranscriptSegment {
        text: Some(text),
        words: Some(group_into_words(&tokens)),
    })
}

fn tokens_from_segment(segment: &WhisperSegment) -> Result<Vec<Token>> {
    let token_count = segment.n_tokens();
    let token_count = usize::try_from(token_count)
        .with_context(|| format!("segment reported negative token count: {token_count}"))?;
    let mut tokens = Vec::with_capacity(token_count);

    for token_idx in 0..token_count {
        let token = segment
            .get_token(token_idx as i32)
            .context("failed to get token from segment")?;

        let data = token.token_data();
        let text = token
            .to_str()
            .with_context(|| format!("failed to get token text at index {token_idx}"))?
            .to_owned();

        // whisper uses -1 for unknown timestamps; the conversion clamps to 0.
        tokens.push(Token {
            text,
            start_seconds: centiseconds_to_seconds(data.t0),
            end_seconds: centiseconds_to_seconds(data.t1),
        });
    }

    Ok(tokens)
}

/// Decoding settings for a single `full()` pass.
fn build_full_params(language: Option<&str>) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    // Use all logical CPUs for decoding.
    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    params.set_language(language);
    params.set_no_context(true);
    params.set_single_segment(false);

    // Silence whisper.cpp's own console output.
    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    // Word timings are built from token timestamps.
    params.set_token_timestamps(true);

    params
}

fn run_whisper_full(
    ctx: &WhisperContext,
    language: Option<&str>,
    samples: &[f32],
) -> Result<WhisperState> {
    let params = build_full_params(language);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}
