use crate::Result;
use crate::cue::{AlignedCue, sort_by_start};

/// A streaming writer for aligned cues.
///
/// Encoders number cues themselves in the order they receive them. `close` is idempotent and
/// writing after it is an error.
pub trait CueEncoder {
    /// Append one cue to the output.
    fn write_cue(&mut self, cue: &AlignedCue) -> Result<()>;

    /// Finish the output (closing brackets, flush).
    fn close(&mut self) -> Result<()>;
}

/// Write `cues` in chronological order and close the encoder.
pub fn encode_all(encoder: &mut dyn CueEncoder, cues: &[AlignedCue]) -> Result<()> {
    // Sort references; the caller's slice is left as is.
    let mut ordered: Vec<&AlignedCue> = cues.iter().collect();
    sort_by_start(&mut ordered, |c| c.start);

    for cue in ordered {
        encoder.write_cue(cue)?;
    }
    encoder.close()
}
