//! Transcript ingest.
//!
//! A recognizer reports its output as segments, each optionally carrying word-level timings.
//! Alignment only cares about the words, so ingest flattens every segment into one ordered
//! word sequence and records how far the recognized speech reaches.
//!
//! The JSON helpers read and write the same shape whisper emits with word timestamps enabled:
//!
//! ```json
//! { "segments": [ { "text": " Hello world.", "words": [ { "word": " Hello", "start": 0.0, "end": 0.5 } ] } ] }
//! ```
//!
//! A bare array of segments is accepted as well.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::word::Word;

/// One recognizer segment. Segments without word-level data contribute nothing to alignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub words: Option<Vec<Word>>,
}

impl TranscriptSegment {
    pub fn with_words(words: Vec<Word>) -> Self {
        Self {
            text: None,
            words: Some(words),
        }
    }
}

/// The flattened word sequence of one recognition run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    words: Vec<Word>,
    total_duration: f64,
}

impl Transcript {
    /// Flatten segments in order. Word text is trimmed of the leading space recognizers attach.
    pub fn from_segments(segments: impl IntoIterator<Item = TranscriptSegment>) -> Self {
        let words: Vec<Word> = segments
            .into_iter()
            .filter_map(|segment| segment.words)
            .flatten()
            .map(|word| Word {
                text: word.text.trim().to_owned(),
                ..word
            })
            .collect();

        let total_duration = words.iter().map(|w| w.end).fold(0.0, f64::max);

        debug!(words = words.len(), total_duration, "ingested transcript");

        Self {
            words,
            total_duration,
        }
    }

    pub fn from_words(words: Vec<Word>) -> Self {
        Self::from_segments([TranscriptSegment::with_words(words)])
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Latest word end observed across all segments, or `0.0` when nothing was recognized.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptDocument {
    Object { segments: Vec<TranscriptSegment> },
    Segments(Vec<TranscriptSegment>),
}

#[derive(Serialize)]
struct TranscriptDocumentRef<'a> {
    segments: &'a [TranscriptSegment],
}

/// Parse transcript segments from JSON.
pub fn read_segments_json<R: Read>(r: R) -> Result<Vec<TranscriptSegment>> {
    let doc: TranscriptDocument = serde_json::from_reader(r)?;
    Ok(match doc {
        TranscriptDocument::Object { segments } | TranscriptDocument::Segments(segments) => {
            segments
        }
    })
}

/// Load transcript segments from a JSON file.
pub fn load_segments(path: impl AsRef<Path>) -> Result<Vec<TranscriptSegment>> {
    let file = File::open(path.as_ref())?;
    read_segments_json(BufReader::new(file))
}

/// Serialize segments as a `{"segments": [...]}` document.
pub fn write_segments_json<W: Write>(w: W, segments: &[TranscriptSegment]) -> Result<()> {
    let mut w = BufWriter::new(w);
    serde_json::to_writer_pretty(&mut w, &TranscriptDocumentRef { segments })?;
    w.flush()?;
    Ok(())
}

/// Save segments to a JSON file so a later run can skip recognition.
pub fn save_segments(path: impl AsRef<Path>, segments: &[TranscriptSegment]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_segments_json(file, segments)
}
