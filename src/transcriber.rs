use crate::Result;
use crate::transcript::TranscriptSegment;

/// Pluggable speech recognizer used by [`crate::Aligner`].
///
/// A transcriber turns mono `f32` samples at [`crate::audio::TARGET_SAMPLE_RATE`] into segments
/// carrying word-level timings. The call is blocking and cannot be interrupted; callers that
/// need responsiveness should run the whole alignment on a worker thread.
pub trait Transcriber {
    fn transcribe(&mut self, samples_16k_mono: &[f32]) -> Result<Vec<TranscriptSegment>>;
}

impl<T: Transcriber + ?Sized> Transcriber for Box<T> {
    fn transcribe(&mut self, samples_16k_mono: &[f32]) -> Result<Vec<TranscriptSegment>> {
        (**self).transcribe(samples_16k_mono)
    }
}

impl<T: Transcriber + ?Sized> Transcriber for &mut T {
    fn transcribe(&mut self, samples_16k_mono: &[f32]) -> Result<Vec<TranscriptSegment>> {
        (**self).transcribe(samples_16k_mono)
    }
}
