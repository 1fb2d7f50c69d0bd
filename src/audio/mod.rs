//! Audio preprocessing for the speech recognizer.
//!
//! The recognizer wants mono `f32` samples at [`TARGET_SAMPLE_RATE`]. Preprocessing decodes any
//! container Symphonia understands, averages channels to mono, resamples, and peak-normalizes.
//! Everything happens in memory, so no intermediate file is ever written.
//!
//! Preprocessing is best-effort: when it fails, the original file is read as-is, which only
//! works if it already is a 16 kHz mono WAV. Only when both paths fail is the run aborted.

mod decode;
mod pipeline;
mod wav;

use std::path::Path;

use tracing::{debug, warn};

use crate::opts::AudioOpts;
use crate::{Error, Result};

pub use pipeline::{downmix_to_mono, normalize_peak, resample_to_target};
pub use wav::read_target_wav;

/// Sample rate (Hz) expected by the speech recognizer.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Produce recognizer-ready samples for `path`, falling back to the untouched file.
pub fn load_samples(path: impl AsRef<Path>, opts: &AudioOpts) -> Result<Vec<f32>> {
    let path = path.as_ref();
    fall_back(path, preprocess(path, opts))
}

/// Keep preprocessed samples, or read `path` as-is when preprocessing failed.
fn fall_back(path: &Path, preprocessed: anyhow::Result<Vec<f32>>) -> Result<Vec<f32>> {
    match preprocessed {
        Ok(samples) => {
            debug!(path = %path.display(), samples = samples.len(), "preprocessed audio");
            Ok(samples)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = ?err,
                "audio preprocessing failed; using the original file as-is"
            );
            read_target_wav(path).map_err(|fallback_err| Error::NoAudio {
                path: path.to_path_buf(),
                reason: format!("{fallback_err:#}"),
            })
        }
    }
}

/// Decode, downmix, resample and (optionally) normalize `path`.
pub fn preprocess(path: &Path, opts: &AudioOpts) -> anyhow::Result<Vec<f32>> {
    let decoded = decode::decode_file(path)?;
    anyhow::ensure!(!decoded.samples.is_empty(), "decoded audio is empty");

    let mut samples = resample_to_target(&decoded.samples, decoded.sample_rate)?;
    if opts.normalize_level {
        normalize_peak(&mut samples, opts.target_peak);
    }
    Ok(samples)
}
