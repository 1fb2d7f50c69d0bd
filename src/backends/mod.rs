/// Built-in speech recognizers.
#[cfg(feature = "whisper")]
pub mod whisper;
