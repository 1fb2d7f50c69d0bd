use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::error;

use cuesync::transcript::load_segments;
use cuesync::{AlignOpts, Alignment, AudioOpts, OutputType, align_with_transcript};

fn main() -> ExitCode {
    cuesync::init_logging();
    let params = Params::parse();

    match run(&params) {
        Ok(alignment) => {
            println!(
                "aligned {} cues ({} matched, {} placed proportionally, {} pushed back) -> {}",
                alignment.cues.len(),
                alignment.matched_count(),
                alignment.proportional_count(),
                alignment.clamped_count(),
                params.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = ?err, "alignment failed");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cuesync")]
#[command(about = "Re-time a subtitle file against a re-recorded narration track")]
#[cfg_attr(not(feature = "whisper"), allow(dead_code))]
struct Params {
    /// SubRip file authored against the original recording.
    #[arg(short = 's', long = "subtitles")]
    pub subtitles: PathBuf,

    /// Where to write the re-timed cues.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// The new recording.
    #[arg(short = 'a', long = "audio", required_unless_present = "transcript")]
    pub audio: Option<PathBuf>,

    /// whisper.cpp model used to transcribe `--audio`.
    #[arg(short = 'm', long = "model", requires = "audio")]
    pub model: Option<String>,

    /// Precomputed transcript JSON; skips speech recognition entirely.
    #[arg(
        short = 't',
        long = "transcript",
        conflicts_with_all = ["audio", "model"]
    )]
    pub transcript: Option<PathBuf>,

    /// Language hint for the recognizer, e.g. `en`.
    #[arg(short = 'l', long = "language")]
    pub language: Option<String>,

    /// Save the recognizer output so later runs can pass it to `--transcript`.
    #[arg(long = "save-transcript", requires = "audio")]
    pub save_transcript: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Srt
    )]
    pub output_type: OutputType,

    /// JSON file with `align` and `audio` sections; flags below override it.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "similarity-threshold")]
    pub similarity_threshold: Option<f64>,

    #[arg(long = "min-gap")]
    pub min_gap_seconds: Option<f64>,

    #[arg(long = "buffer")]
    pub buffer_seconds: Option<f64>,

    #[arg(long = "fallback-seconds-per-char")]
    pub fallback_seconds_per_char: Option<f64>,

    #[arg(long = "base-seconds-per-char")]
    pub base_seconds_per_char: Option<f64>,

    #[arg(long = "max-duration-span-words")]
    pub max_duration_span_words: Option<usize>,

    #[arg(long = "lookahead-factor")]
    pub lookahead_factor: Option<f64>,

    /// Skip peak normalization of the decoded audio.
    #[arg(long = "no-normalize-level", default_value_t = false)]
    pub no_normalize_level: bool,

    #[arg(long = "target-peak")]
    pub target_peak: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    align: AlignOpts,
    audio: AudioOpts,
}

fn run(params: &Params) -> Result<Alignment> {
    let (align_opts, audio_opts) = resolve_opts(params)?;

    if let Some(transcript) = &params.transcript {
        let segments = load_segments(transcript)
            .with_context(|| format!("failed to load transcript '{}'", transcript.display()))?;
        let alignment = align_with_transcript(
            &params.subtitles,
            segments,
            &params.output,
            &align_opts,
            params.output_type,
        )?;
        return Ok(alignment);
    }

    let audio = params
        .audio
        .as_deref()
        .context("either --audio or --transcript is required")?;
    transcribe_and_align(params, audio, align_opts, audio_opts)
}

#[cfg(feature = "whisper")]
fn transcribe_and_align(
    params: &Params,
    audio: &Path,
    align_opts: AlignOpts,
    audio_opts: AudioOpts,
) -> Result<Alignment> {
    use cuesync::transcript::save_segments;
    use cuesync::{Aligner, WhisperTranscriber};

    let model = params
        .model
        .as_deref()
        .context("--model is required when transcribing --audio")?;
    let transcriber = WhisperTranscriber::new(model)?
        .with_language(params.language.clone());

    let mut aligner = Aligner::new(transcriber)
        .with_align_opts(align_opts)
        .with_audio_opts(audio_opts)
        .with_output_type(params.output_type);
    let run = aligner.run(audio, &params.subtitles, &params.output)?;

    if let Some(path) = &params.save_transcript {
        save_segments(path, &run.segments)
            .with_context(|| format!("failed to save transcript '{}'", path.display()))?;
    }

    Ok(run.alignment)
}

#[cfg(not(feature = "whisper"))]
fn transcribe_and_align(
    _params: &Params,
    audio: &Path,
    _align_opts: AlignOpts,
    _audio_opts: AudioOpts,
) -> Result<Alignment> {
    anyhow::bail!(
        "cannot transcribe '{}': cuesync was built without the `whisper` feature; pass --transcript instead",
        audio.display()
    )
}

/// Defaults, then the config file, then individual flags.
fn resolve_opts(params: &Params) -> Result<(AlignOpts, AudioOpts)> {
    let ConfigFile {
        align: mut align_opts,
        audio: mut audio_opts,
    } = match &params.config {
        Some(path) => read_config(path)?,
        None => ConfigFile::default(),
    };

    if let Some(v) = params.similarity_threshold {
        align_opts.similarity_threshold = v;
    }
    if let Some(v) = params.min_gap_seconds {
        align_opts.min_gap_seconds = v;
    }
    if let Some(v) = params.buffer_seconds {
        align_opts.buffer_seconds = v;
    }
    if let Some(v) = params.fallback_seconds_per_char {
        align_opts.fallback_seconds_per_char = v;
    }
    if let Some(v) = params.base_seconds_per_char {
        align_opts.base_seconds_per_char = v;
    }
    if let Some(v) = params.max_duration_span_words {
        align_opts.max_duration_span_words = v;
    }
    if let Some(v) = params.lookahead_factor {
        align_opts.lookahead_factor = v;
    }
    if params.no_normalize_level {
        audio_opts.normalize_level = false;
    }
    if let Some(v) = params.target_peak {
        audio_opts.target_peak = v;
    }

    align_opts.validate()?;
    audio_opts.validate()?;
    Ok((align_opts, audio_opts))
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config file '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}
