//! Candidate window selection.
//!
//! Positional matching only looks at a neighborhood of the search cursor. The neighborhood is
//! sized from the pacing still ahead: if `W` words remain for `S` cues, a cue is expected to
//! span about `W / S` words, and the window covers `lookahead_factor` times that. It also
//! reaches back by the cue's own word count so a previous match that overshot can be recovered.

use std::ops::Range;

/// Inputs that determine where the next cue may match.
#[derive(Debug, Clone, Copy)]
pub struct WindowRequest {
    /// Position of the cue in processing order.
    pub cue_index: usize,
    /// Total number of cues in the run.
    pub cue_count: usize,
    /// Number of words in the transcript.
    pub word_total: usize,
    /// Words already consumed by earlier matches.
    pub cursor: usize,
    /// Word count of the cue's normalized text.
    pub cue_words: usize,
}

/// Half-open range of start offsets worth scoring for one cue. May be empty.
pub fn select_window(req: WindowRequest, lookahead_factor: f64) -> Range<usize> {
    let remaining_cues = req.cue_count.saturating_sub(req.cue_index).max(1);
    let remaining_words = req.word_total.saturating_sub(req.cursor);

    let avg_words_per_cue = remaining_words as f64 / remaining_cues as f64;
    let lookahead = (avg_words_per_cue * lookahead_factor).floor() as usize;
    let lookahead = lookahead.min(remaining_words);

    let start = req.cursor.saturating_sub(req.cue_words);
    let end = req.word_total.min(req.cursor + lookahead);

    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(
        cue_index: usize,
        cue_count: usize,
        word_total: usize,
        cursor: usize,
        cue_words: usize,
    ) -> WindowRequest {
        WindowRequest {
            cue_index,
            cue_count,
            word_total,
            cursor,
            cue_words,
        }
    }

    #[test]
    fn first_cue_looks_two_cues_ahead() {
        // 100 words over 10 cues: 10 per cue, window of 20.
        assert_eq!(select_window(req(0, 10, 100, 0, 3), 2.0), 0..20);
    }

    #[test]
    fn window_looks_back_by_the_cue_word_count() {
        assert_eq!(select_window(req(5, 10, 100, 50, 4), 2.0), 46..70);
    }

    #[test]
    fn last_cue_can_reach_the_end_of_the_transcript() {
        assert_eq!(select_window(req(9, 10, 100, 90, 2), 2.0), 88..100);
    }

    #[test]
    fn exhausted_transcript_keeps_only_the_look_back() {
        assert_eq!(select_window(req(3, 4, 10, 10, 2), 2.0), 8..10);
    }

    #[test]
    fn empty_transcript_yields_an_empty_window() {
        assert!(select_window(req(0, 3, 0, 0, 2), 2.0).is_empty());
    }

    #[test]
    fn sparse_transcript_can_produce_a_zero_width_window() {
        // 1 word left for 5 cues: floor(0.2 * 2) = 0 words of lookahead.
        let window = select_window(req(0, 5, 1, 0, 0), 2.0);
        assert!(window.is_empty());
    }
}
