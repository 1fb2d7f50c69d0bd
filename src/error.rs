use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Cuesync's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Cuesync's crate-wide error type.
///
/// Only conditions that make a run unusable surface here. Weak matches, empty transcripts and
/// preprocessing failures degrade to fallbacks inside the pipeline instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A subtitle block had index, timing and text lines, but the timing line did not parse.
    #[error("malformed subtitle block at line {line}: {reason}")]
    Subtitle { line: usize, reason: String },

    /// The subtitle input contained no usable cues.
    #[error("no usable subtitle cues in '{}'", path.display())]
    NoCues { path: PathBuf },

    /// Neither the preprocessed nor the original audio could be read.
    #[error("no usable audio in '{}': {reason}", path.display())]
    NoAudio { path: PathBuf, reason: String },

    /// An alignment or audio parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Other(Box::new(err))
    }
}
