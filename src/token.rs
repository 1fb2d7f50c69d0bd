//! Sub-word tokens and their grouping into words.
//!
//! Recognizers such as whisper time individual BPE tokens. A token whose text starts with a
//! space begins a new word; anything else continues the current one. Control tokens carry no
//! speech and are dropped before grouping.

use crate::word::Word;

/// A single timed token produced by a recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
}

/// Whisper formats control tokens as `[_BEG_]`, `[_TT_50]`, `[_SOT_]` and so on.
pub fn is_control_token(text: &str) -> bool {
    text.starts_with("[_") && text.ends_with(']')
}

/// Merge tokens into words. Each word spans from its first token's start to its last token's end.
pub fn group_into_words(tokens: &[Token]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Vec<&Token> = Vec::new();

    for token in tokens.iter().filter(|t| !is_control_token(&t.text)) {
        if token.text.starts_with(' ') && !current.is_empty() {
            words.extend(finish_word(&current));
            current.clear();
        }
        current.push(token);
    }
    words.extend(finish_word(&current));

    words
}

fn finish_word(tokens: &[&Token]) -> Option<Word> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(Word::new(text, first.start_seconds, last.end_seconds))
}
