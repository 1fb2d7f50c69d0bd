//! Timeline reconciliation.
//!
//! Cues are placed one at a time, in order, as a fold over a [`Timeline`] accumulator. Two pieces
//! of state cross from one cue to the next:
//!
//! - the search cursor, which only ever moves forward as cues match, and
//! - the end of the previously placed cue, which the next cue must start after by at least
//!   `min_gap_seconds`.
//!
//! Each cue is either anchored at the first word of its best positional match, or, when nothing
//! in its window scores above the threshold, placed proportionally along the recognized audio
//! (`i / N * total_duration`). Its length is the larger of its original duration and a floor
//! derived from the duration estimate plus a buffer.

use tracing::{debug, info, warn};

use crate::cue::{AlignedCue, SourceCue, sort_by_start};
use crate::duration::estimate_speech_duration;
use crate::matcher::{NormalizedWords, SpanMatch, find_match};
use crate::normalize::{collapse_whitespace, normalize, word_count};
use crate::opts::AlignOpts;
use crate::similarity::Reference;
use crate::transcript::Transcript;
use crate::window::{WindowRequest, select_window};

/// How a cue's start time was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Anchored at the first word of a matched span.
    Matched(SpanMatch),
    /// Placed at `progress * total_duration` because no span matched.
    Proportional { progress: f64 },
}

/// The reasoning behind one aligned cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueDecision {
    pub placement: Placement,
    /// Output of the duration estimator.
    pub speech_duration: f64,
    /// `max(base estimate, speech duration) + buffer`; the cue never ends sooner than this.
    pub min_duration: f64,
    /// Whether the start was pushed back to respect the gap after the previous cue.
    pub clamped: bool,
}

/// Result of aligning one cue list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// Aligned cues in chronological order.
    pub cues: Vec<AlignedCue>,
    /// `decisions[i]` explains the placement of the `i`-th source cue.
    pub decisions: Vec<CueDecision>,
}

impl Alignment {
    pub fn matched_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d.placement, Placement::Matched(_)))
            .count()
    }

    pub fn proportional_count(&self) -> usize {
        self.decisions.len() - self.matched_count()
    }

    pub fn clamped_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.clamped).count()
    }
}

/// Accumulator threaded through the per-cue fold.
#[derive(Debug, Default)]
struct Timeline {
    cursor: usize,
    last_end: Option<f64>,
    alignment: Alignment,
}

/// Per-run inputs shared by every step of the fold.
struct Context<'a> {
    words: NormalizedWords<'a>,
    total_duration: f64,
    cue_count: usize,
    opts: &'a AlignOpts,
}

/// Re-time `cues` against `transcript`.
///
/// Cues are processed in the order given; [`crate::srt::read_source_cues`] already returns
/// them sorted with overlaps separated. This never fails: every cue gets a placement, and
/// the output satisfies `end > start` and `next.start >= prev.end + min_gap`.
pub fn align(cues: &[SourceCue], transcript: &Transcript, opts: &AlignOpts) -> Alignment {
    if transcript.is_empty() && !cues.is_empty() {
        warn!("transcript has no words; every cue will be placed proportionally");
    }

    let ctx = Context {
        words: NormalizedWords::new(transcript.words()),
        total_duration: transcript.total_duration(),
        cue_count: cues.len(),
        opts,
    };

    let timeline = cues
        .iter()
        .enumerate()
        .fold(Timeline::default(), |timeline, (i, cue)| ctx.place(timeline, i, cue));

    let mut alignment = timeline.alignment;
    sort_by_start(&mut alignment.cues, |c| c.start);

    info!(
        cues = alignment.cues.len(),
        matched = alignment.matched_count(),
        proportional = alignment.proportional_count(),
        clamped = alignment.clamped_count(),
        "alignment complete"
    );

    alignment
}

impl Context<'_> {
    fn place(&self, mut timeline: Timeline, i: usize, cue: &SourceCue) -> Timeline {
        let opts = self.opts;
        let normalized = collapse_whitespace(&normalize(&cue.text));
        let cue_words = word_count(&normalized);
        let reference = Reference::new(&normalized);

        let window = select_window(
            WindowRequest {
                cue_index: i,
                cue_count: self.cue_count,
                word_total: self.words.len(),
                cursor: timeline.cursor,
                cue_words,
            },
            opts.lookahead_factor,
        );
        let matched = find_match(
            &reference,
            cue_words,
            &self.words,
            window.clone(),
            opts.similarity_threshold,
        );

        let speech_duration = estimate_speech_duration(&reference, &self.words, opts);
        let base_estimate = reference.len() as f64 * opts.base_seconds_per_char;
        let min_duration = base_estimate.max(speech_duration) + opts.buffer_seconds;
        let hold = min_duration.max(cue.duration);

        let (mut start, placement) = match matched {
            Some(span) => {
                timeline.cursor = timeline.cursor.max(span.end);
                (self.words.words()[span.start].start, Placement::Matched(span))
            }
            None => {
                let progress = i as f64 / self.cue_count as f64;
                if !self.words.is_empty() {
                    warn!(
                        cue = i,
                        progress,
                        "no transcript span matched; placing cue proportionally"
                    );
                }
                (
                    progress * self.total_duration,
                    Placement::Proportional { progress },
                )
            }
        };

        let mut clamped = false;
        if let Some(last_end) = timeline.last_end {
            let earliest = last_end + opts.min_gap_seconds;
            if start < earliest {
                start = earliest;
                clamped = true;
            }
        }
        let end = start + hold;

        debug!(
            cue = i,
            window_start = window.start,
            window_end = window.end,
            matched = matches!(placement, Placement::Matched(_)),
            start,
            end,
            speech_duration,
            clamped,
            "placed cue"
        );

        timeline.last_end = Some(end);
        timeline.alignment.cues.push(AlignedCue {
            start,
            end,
            text: cue.text.clone(),
        });
        timeline.alignment.decisions.push(CueDecision {
            placement,
            speech_duration,
            min_duration,
            clamped,
        });
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word;

    fn scenario() -> (Vec<SourceCue>, Transcript) {
        let cues = vec![
            SourceCue::new(1, "hello world", 0.0, 2.0),
            SourceCue::new(2, "goodbye now", 2.0, 4.0),
        ];
        let transcript = Transcript::from_words(vec![
            Word::new("hello", 0.0, 0.5),
            Word::new("world", 0.5, 1.0),
            Word::new("goodbye", 5.0, 5.6),
            Word::new("now", 5.6, 6.0),
        ]);
        (cues, transcript)
    }

    #[test]
    fn anchors_cues_at_their_matched_words() {
        let (cues, transcript) = scenario();
        let alignment = align(&cues, &transcript, &AlignOpts::default());

        assert_eq!(alignment.cues[0].start, 0.0);
        assert!(alignment.cues[1].start >= 5.0);
        assert!(alignment.cues[1].start >= alignment.cues[0].end + 0.05);
        assert_eq!(alignment.matched_count(), 2);
    }

    #[test]
    fn keeps_the_original_duration_when_it_is_longer() {
        let (cues, transcript) = scenario();
        let alignment = align(&cues, &transcript, &AlignOpts::default());

        // Floor for "hello world" is max(11 * 0.06, 1.0) + 0.4 = 1.4 < 2.0.
        assert!((alignment.cues[0].end - 2.0).abs() < 1e-9);
        assert!((alignment.decisions[0].min_duration - 1.4).abs() < 1e-9);
    }

    #[test]
    fn cursor_moves_past_the_matched_span() {
        let (cues, transcript) = scenario();
        let alignment = align(&cues, &transcript, &AlignOpts::default());
        match alignment.decisions[0].placement {
            Placement::Matched(span) => assert_eq!((span.start, span.end), (0, 2)),
            other => panic!("expected a match, got {other:?}"),
        }
        match alignment.decisions[1].placement {
            Placement::Matched(span) => assert_eq!((span.start, span.end), (2, 4)),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_cues_are_placed_proportionally() {
        let cues = vec![
            SourceCue::new(1, "hello world", 0.0, 1.0),
            SourceCue::new(2, "qqq", 1.0, 2.0),
        ];
        let transcript = Transcript::from_words(vec![
            Word::new("hello", 0.0, 0.5),
            Word::new("world", 0.5, 1.0),
            Word::new("filler", 9.0, 10.0),
        ]);
        let alignment = align(&cues, &transcript, &AlignOpts::default());

        assert_eq!(
            alignment.decisions[1].placement,
            Placement::Proportional { progress: 0.5 }
        );
        assert!((alignment.cues[1].start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn starts_are_clamped_behind_the_previous_end() {
        let cues = vec![
            SourceCue::new(1, "one two three", 0.0, 3.0),
            SourceCue::new(2, "four", 3.0, 4.0),
        ];
        let transcript = Transcript::from_words(vec![
            Word::new("one", 0.0, 0.2),
            Word::new("two", 0.2, 0.4),
            Word::new("three", 0.4, 0.6),
            Word::new("four", 0.6, 0.8),
        ]);
        let alignment = align(&cues, &transcript, &AlignOpts::default());

        assert!(alignment.decisions[1].clamped);
        assert!((alignment.cues[1].start - 3.05).abs() < 1e-9);
    }

    #[test]
    fn empty_transcript_still_yields_an_ordered_timeline() {
        let cues = vec![
            SourceCue::new(1, "a", 0.0, 1.0),
            SourceCue::new(2, "b", 1.0, 2.0),
            SourceCue::new(3, "c", 2.0, 3.0),
        ];
        let alignment = align(&cues, &Transcript::default(), &AlignOpts::default());

        assert_eq!(alignment.proportional_count(), 3);
        assert_eq!(alignment.cues[0].start, 0.0);
        for pair in alignment.cues.windows(2) {
            assert!(pair[1].start + 1e-9 >= pair[0].end + 0.05);
        }
    }

    #[test]
    fn multi_line_cues_match_their_words_exactly() {
        let cues = vec![SourceCue::new(1, "Hello there,\nmy  friend.", 0.0, 2.0)];
        let transcript = Transcript::from_words(vec![
            Word::new("hello", 1.0, 1.3),
            Word::new("there", 1.3, 1.6),
            Word::new("my", 1.6, 1.8),
            Word::new("friend", 1.8, 2.2),
        ]);
        let alignment = align(&cues, &transcript, &AlignOpts::default());

        match alignment.decisions[0].placement {
            Placement::Matched(span) => {
                assert_eq!((span.start, span.end), (0, 4));
                assert_eq!(span.ratio, 1.0);
            }
            other => panic!("expected a match, got {other:?}"),
        }
        assert_eq!(alignment.cues[0].text, "Hello there,\nmy  friend.");
    }

    #[cfg(feature = "logging")]
    #[test]
    fn proportional_fallback_is_logged_as_a_warning() -> anyhow::Result<()> {
        use std::io::{self, Write};
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0
                    .lock()
                    .map_err(|_| io::Error::other("log buffer poisoned"))?
                    .extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || sink.clone())
            .finish();

        let cues = vec![
            SourceCue::new(1, "hello world", 0.0, 1.0),
            SourceCue::new(2, "qqq", 1.0, 2.0),
        ];
        let transcript = Transcript::from_words(vec![
            Word::new("hello", 0.0, 0.5),
            Word::new("world", 0.5, 1.0),
        ]);
        tracing::subscriber::with_default(subscriber, || {
            align(&cues, &transcript, &AlignOpts::default())
        });

        let logs = captured
            .0
            .lock()
            .map_err(|_| anyhow::anyhow!("log buffer poisoned"))?
            .clone();
        let logs = String::from_utf8(logs)?;
        assert_eq!(logs.matches("placing cue proportionally").count(), 1);
        Ok(())
    }

    #[test]
    fn empty_cue_list_is_empty_alignment() {
        let (_, transcript) = scenario();
        let alignment = align(&[], &transcript, &AlignOpts::default());
        assert_eq!(alignment, Alignment::default());
    }
}
