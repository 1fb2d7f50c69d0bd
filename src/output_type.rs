/// The supported formats for the aligned output.
///
/// With the `cli` feature this doubles as a `clap` value enum so the binary can take it
/// directly as a flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// SubRip, the same format as the input.
    #[default]
    Srt,

    /// WebVTT.
    Vtt,

    /// A JSON array of `{start, end, text}` objects.
    Json,
}
