use std::io::Write;

use crate::Result;
use crate::cue::AlignedCue;
use crate::cue_encoder::CueEncoder;

/// A `CueEncoder` that writes cues as a single JSON array.
///
/// The array is opened lazily and closed in `close`, so an empty run still produces `[]`.
///
/// Example output:
/// ```json
/// [{"start":0.0,"end":1.4,"text":"hello world"},{"start":5.0,"end":6.0,"text":"goodbye now"}]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    /// The underlying writer we stream JSON into.
    w: W,

    /// Whether we have written the opening `[` of the JSON array.
    started: bool,

    /// Whether the next element is the first one (no leading comma).
    first: bool,

    /// Whether the encoder has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Create a new JSON array encoder that writes to the given writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    /// Write the opening `[` if we have not already done so.
    ///
    /// Deferred so that closing an unused encoder still yields `[]`.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> CueEncoder for JsonArrayEncoder<W> {
    /// Serialize a single cue and append it to the JSON array.
    fn write_cue(&mut self, cue: &AlignedCue) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write cue: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Write a comma before every element except the first.
        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        // Stream the cue directly into the writer as JSON.
        serde_json::to_writer(&mut self.w, cue)?;
        Ok(())
    }

    /// Close the JSON array and flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        // Ensure `[]` for an empty run.
        self.start_if_needed()?;
        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
