use std::io::Write;

use crate::Result;
use crate::cue::AlignedCue;
use crate::cue_encoder::CueEncoder;

/// A `CueEncoder` that writes cues in WebVTT format.
///
/// The `WEBVTT` header is written lazily on the first cue, so a run that produces nothing
/// leaves the writer untouched.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    /// Write the WebVTT header if we haven't written it yet.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // Mandatory header line followed by a blank line.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> CueEncoder for VttEncoder<W> {
    /// Write a single cue in WebVTT format.
    fn write_cue(&mut self, cue: &AlignedCue) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write cue: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // WebVTT timestamps use `HH:MM:SS.mmm`; cue identifiers are optional and omitted.
        writeln!(
            &mut self.w,
            "{} --> {}",
            format_timestamp_vtt(cue.start),
            format_timestamp_vtt(cue.end)
        )?;
        writeln!(&mut self.w, "{}", cue.text)?;

        // Blank line separates cues.
        writeln!(&mut self.w)?;

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

/// Same as the SubRip form but with a `.` before the milliseconds.
fn format_timestamp_vtt(seconds: f64) -> String {
    crate::srt::format_timestamp(seconds).replacen(',', ".", 1)
}
