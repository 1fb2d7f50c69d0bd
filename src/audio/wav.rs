use std::path::Path;

use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader};

use super::TARGET_SAMPLE_RATE;

/// Read a WAV file that already is in the recognizer's format, without any conversion.
///
/// Format requirements:
/// - Mono (1 channel)
/// - [`TARGET_SAMPLE_RATE`]
/// - Integer PCM (any bit depth) or 32-bit float
pub fn read_target_wav(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)
        .with_context(|| format!("failed to read WAV data from '{}'", path.display()))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        bail!(
            "expected mono WAV (1 channel), got {} channels",
            spec.channels
        );
    }
    if spec.sample_rate != TARGET_SAMPLE_RATE {
        bail!(
            "expected {} Hz sample rate, got {} Hz",
            TARGET_SAMPLE_RATE,
            spec.sample_rate
        );
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<hound::Result<_>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<hound::Result<_>>()?
        }
    };

    if samples.is_empty() {
        bail!("WAV file contains no samples");
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(
        path: &Path,
        channels: u16,
        sample_rate: u32,
        samples: &[i16],
    ) -> anyhow::Result<()> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for s in samples {
            writer.write_sample(*s)?;
        }
        writer.finalize()?;
        Ok(())
    }

    #[test]
    fn reads_16k_mono_pcm() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ok.wav");
        write_wav(&path, 1, TARGET_SAMPLE_RATE, &[0, 16_384, -32_768])?;

        let samples = read_target_wav(&path)?;
        assert_eq!(samples, vec![0.0, 0.5, -1.0]);
        Ok(())
    }

    #[test]
    fn rejects_other_rates_and_layouts() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let stereo = dir.path().join("stereo.wav");
        write_wav(&stereo, 2, TARGET_SAMPLE_RATE, &[0, 0])?;
        let err = read_target_wav(&stereo).unwrap_err();
        assert!(err.to_string().contains("mono"), "{err}");

        let slow = dir.path().join("8k.wav");
        write_wav(&slow, 1, 8_000, &[0, 0])?;
        let err = read_target_wav(&slow).unwrap_err();
        assert!(err.to_string().contains("Hz"), "{err}");
        Ok(())
    }
}
