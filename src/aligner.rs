//! High-level API for re-timing a subtitle file against a new recording.
//!
//! [`Aligner`] wires the pieces together in the order that keeps failures cheap:
//! subtitles are parsed first (a file with no usable cues aborts before any audio work),
//! then audio is prepared and transcribed, the transcript is ingested, cues are aligned, and
//! the result is written.
//!
//! Output goes through a temporary file next to the destination and is only persisted once
//! every cue has been encoded, so a failed run never leaves a partial file behind.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::Result;
use crate::audio::load_samples;
use crate::cue::AlignedCue;
use crate::cue_encoder::encode_all;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::opts::{AlignOpts, AudioOpts};
use crate::output_type::OutputType;
use crate::reconcile::{Alignment, align};
use crate::srt::read_source_cues;
use crate::srt_encoder::SrtEncoder;
use crate::transcriber::Transcriber;
use crate::transcript::{Transcript, TranscriptSegment};
use crate::vtt_encoder::VttEncoder;

/// The main entry point: owns a speech recognizer and the options for each run.
///
/// Construct once (recognizer models are expensive to load) and call [`Aligner::run`] as many
/// times as needed.
pub struct Aligner<T: Transcriber> {
    transcriber: T,
    align_opts: AlignOpts,
    audio_opts: AudioOpts,
    output_type: OutputType,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Run {
    pub alignment: Alignment,
    /// Raw recognizer output, suitable for [`crate::transcript::save_segments`].
    pub segments: Vec<TranscriptSegment>,
}

impl<T: Transcriber> Aligner<T> {
    pub fn new(transcriber: T) -> Self {
        Self {
            transcriber,
            align_opts: AlignOpts::default(),
            audio_opts: AudioOpts::default(),
            output_type: OutputType::default(),
        }
    }

    pub fn with_align_opts(mut self, opts: AlignOpts) -> Self {
        self.align_opts = opts;
        self
    }

    pub fn with_audio_opts(mut self, opts: AudioOpts) -> Self {
        self.audio_opts = opts;
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub fn align_opts(&self) -> &AlignOpts {
        &self.align_opts
    }

    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    /// Re-time `subtitles` against the speech in `audio` and write the result to `output`.
    pub fn run(
        &mut self,
        audio: impl AsRef<Path>,
        subtitles: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<Run> {
        self.align_opts.validate()?;
        self.audio_opts.validate()?;

        let cues = read_source_cues(subtitles.as_ref(), self.align_opts.min_gap_seconds)?;
        let samples = load_samples(audio.as_ref(), &self.audio_opts)?;

        info!(
            cues = cues.len(),
            samples = samples.len(),
            "transcribing audio"
        );
        let segments = self.transcriber.transcribe(&samples)?;

        let transcript = Transcript::from_segments(segments.iter().cloned());
        let alignment = align(&cues, &transcript, &self.align_opts);
        write_output(output.as_ref(), &alignment.cues, self.output_type)?;

        Ok(Run {
            alignment,
            segments,
        })
    }
}

/// Re-time `subtitles` against an already available transcript, skipping recognition.
pub fn align_with_transcript(
    subtitles: impl AsRef<Path>,
    segments: impl IntoIterator<Item = TranscriptSegment>,
    output: impl AsRef<Path>,
    opts: &AlignOpts,
    output_type: OutputType,
) -> Result<Alignment> {
    opts.validate()?;

    let cues = read_source_cues(subtitles.as_ref(), opts.min_gap_seconds)?;
    let transcript = Transcript::from_segments(segments);
    let alignment = align(&cues, &transcript, opts);
    write_output(output.as_ref(), &alignment.cues, output_type)?;

    Ok(alignment)
}

/// Encode `cues` to `path`, replacing it only once encoding has fully succeeded.
pub fn write_output(path: &Path, cues: &[AlignedCue], output_type: OutputType) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    encode_cues(tmp.as_file_mut(), cues, output_type)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    info!(path = %path.display(), cues = cues.len(), "wrote aligned subtitles");
    Ok(())
}

/// Encode `cues` in chronological order using the encoder for `output_type`.
pub fn encode_cues<W: Write>(w: W, cues: &[AlignedCue], output_type: OutputType) -> Result<()> {
    let writer = BufWriter::new(w);

    match output_type {
        OutputType::Srt => encode_all(&mut SrtEncoder::new(writer), cues),
        OutputType::Vtt => encode_all(&mut VttEncoder::new(writer), cues),
        OutputType::Json => encode_all(&mut JsonArrayEncoder::new(writer), cues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues() -> Vec<AlignedCue> {
        vec![
            AlignedCue {
                start: 5.0,
                end: 6.0,
                text: "goodbye now".to_owned(),
            },
            AlignedCue {
                start: 0.0,
                end: 2.0,
                text: "hello world".to_owned(),
            },
        ]
    }

    #[test]
    fn srt_output_is_renumbered_in_time_order() -> anyhow::Result<()> {
        let mut out = Vec::new();
        encode_cues(&mut out, &cues(), OutputType::Srt)?;
        let text = String::from_utf8(out)?;
        assert_eq!(
            text,
            "1\n00:00:00,000 --> 00:00:02,000\nhello world\n\n\
             2\n00:00:05,000 --> 00:00:06,000\ngoodbye now\n\n"
        );
        Ok(())
    }

    #[test]
    fn vtt_output_has_a_header() -> anyhow::Result<()> {
        let mut out = Vec::new();
        encode_cues(&mut out, &cues(), OutputType::Vtt)?;
        let text = String::from_utf8(out)?;
        assert!(text.starts_with("WEBVTT"));
        assert!(text.contains("00:00:05.000 --> 00:00:06.000"));
        Ok(())
    }

    #[test]
    fn write_output_replaces_the_destination() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.srt");
        std::fs::write(&path, "stale")?;

        write_output(&path, &cues(), OutputType::Srt)?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.starts_with("1\n00:00:00,000"));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
