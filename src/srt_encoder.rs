use std::io::Write;

use crate::Result;
use crate::cue::AlignedCue;
use crate::cue_encoder::CueEncoder;
use crate::srt::format_timestamp;

/// A `CueEncoder` that writes SubRip blocks, numbering cues from 1.
///
/// Blocks are streamed straight to the writer. SubRip has no header or footer, so
/// closing only flushes.
pub struct SrtEncoder<W: Write> {
    /// The underlying writer we stream SubRip into.
    w: W,

    /// Index the next cue will be written with.
    next_index: usize,

    /// Whether the encoder has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    /// Create a new SubRip encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }
}

impl<W: Write> CueEncoder for SrtEncoder<W> {
    /// Write a single numbered SubRip block.
    fn write_cue(&mut self, cue: &AlignedCue) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write cue: encoder is already closed",
            ));
        }

        // Index line, then `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
        writeln!(&mut self.w, "{}", self.next_index)?;
        writeln!(
            &mut self.w,
            "{} --> {}",
            format_timestamp(cue.start),
            format_timestamp(cue.end)
        )?;
        // Multi-line text is written verbatim.
        writeln!(&mut self.w, "{}", cue.text)?;

        // Blank line separates blocks.
        writeln!(&mut self.w)?;

        self.next_index += 1;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}
