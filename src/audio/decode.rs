//! Container probing and packet decoding on top of Symphonia.
//!
//! Error policy while decoding packets:
//! - `DecodeError` skips the bad frame (common with some codecs)
//! - `IoError` is treated as end-of-stream
//! - anything else is fatal

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::pipeline::downmix_to_mono;

/// Mono samples at the source's native rate.
pub(crate) struct Decoded {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

pub(crate) fn decode_file(path: &Path) -> Result<Decoded> {
    let file = File::open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;

    let mss = MediaSourceStream::new(
        Box::new(file),
        MediaSourceStreamOptions {
            // Symphonia expects a power-of-two buffer > 32KiB for good probing behavior.
            buffer_len: 256 * 1024,
        },
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| anyhow!(e))
        .context("failed to detect media format")?;
    let mut format = detected.format;

    // First decodable track with a known sample rate.
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| anyhow!(e))
        .context("failed to create decoder for audio track")?;

    let mut samples = Vec::new();
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or_default();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("failed reading packet"),
        };
        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("decoder failure"),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            bail!("decoded audio had zero channels");
        }
        sample_rate = spec.rate;

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend(downmix_to_mono(buf.samples(), channels));
    }

    if sample_rate == 0 {
        bail!("audio track has no sample rate");
    }

    Ok(Decoded {
        samples,
        sample_rate,
    })
}
