//! PCM normalization: downmix, resample, and level.

use anyhow::{Context, Result, anyhow, bail};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::TARGET_SAMPLE_RATE;

/// Source frames fed to rubato per `process()` call.
const RESAMPLE_CHUNK_FRAMES: usize = 2048;

/// Downmix interleaved samples into mono by averaging channels.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono samples from `src_rate` to [`TARGET_SAMPLE_RATE`].
///
/// The last partial block is zero-padded for rubato and the output trimmed back to the
/// expected length.
pub fn resample_to_target(mono: &[f32], src_rate: u32) -> Result<Vec<f32>> {
    if src_rate == TARGET_SAMPLE_RATE || mono.is_empty() {
        return Ok(mono.to_vec());
    }
    if src_rate == 0 {
        bail!("cannot resample from a 0 Hz source");
    }

    let ratio = TARGET_SAMPLE_RATE as f64 / src_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        2.0,
        SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        },
        RESAMPLE_CHUNK_FRAMES,
        1,
    )
    .map_err(|e| anyhow!(e))
    .context("failed to init resampler")?;

    let expected_len = (mono.len() as f64 * ratio).round() as usize;
    let mut out = Vec::with_capacity(expected_len + RESAMPLE_CHUNK_FRAMES);

    for block in mono.chunks(RESAMPLE_CHUNK_FRAMES) {
        let mut input = block.to_vec();
        input.resize(RESAMPLE_CHUNK_FRAMES, 0.0);

        let processed = resampler
            .process(&[input], None)
            .map_err(|e| anyhow!(e))
            .context("resampler process failed")?;
        let Some(channel) = processed.into_iter().next() else {
            bail!("expected mono output from resampler");
        };
        out.extend(channel);
    }

    out.truncate(expected_len);
    Ok(out)
}

/// Scale samples so the loudest one sits at `target_peak`. Silence is left untouched.
pub fn normalize_peak(samples: &mut [f32], target_peak: f32) {
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak <= f32::EPSILON {
        return;
    }

    let gain = target_peak / peak;
    for s in samples {
        *s *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_to_mono_single_channel_is_identity() {
        let input = vec![0.0, 1.0, -1.0];
        assert_eq!(downmix_to_mono(&input, 1), input);
    }

    #[test]
    fn downmix_to_mono_averages_channels() {
        // Two frames of stereo: (L=1, R=3), (L=-1, R=1) => mono: 2, 0
        let interleaved = vec![1.0, 3.0, -1.0, 1.0];
        assert_eq!(downmix_to_mono(&interleaved, 2), vec![2.0, 0.0]);
    }

    #[test]
    fn resampling_at_the_target_rate_is_a_copy() -> anyhow::Result<()> {
        let input = vec![0.25; 100];
        assert_eq!(resample_to_target(&input, TARGET_SAMPLE_RATE)?, input);
        Ok(())
    }

    #[test]
    fn resampling_scales_the_length() -> anyhow::Result<()> {
        let input = vec![0.0; 8_000 * 2 + 7];
        let out = resample_to_target(&input, 8_000)?;
        assert_eq!(out.len(), ((8_000 * 2 + 7) as f64 * 2.0).round() as usize);
        Ok(())
    }

    #[test]
    fn peak_normalization_hits_the_target() {
        let mut samples = vec![0.1, -0.5, 0.25];
        normalize_peak(&mut samples, 0.8);
        assert!((samples[1] + 0.8).abs() < 1e-6);
        assert!((samples[0] - 0.16).abs() < 1e-6);
    }

    #[test]
    fn silence_is_not_amplified() {
        let mut samples = vec![0.0; 16];
        normalize_peak(&mut samples, 0.9);
        assert!(samples.iter().all(|s| *s == 0.0));
    }
}
