//! SubRip (`.srt`) reading and timestamp handling.
//!
//! A file is a sequence of blocks separated by blank lines:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:02,500
//! First line of text
//! optional second line
//! ```
//!
//! Reading is lenient about layout (CRLF, a UTF-8 BOM, whitespace-only separator lines, a `.`
//! instead of `,` before the milliseconds) and drops blocks with fewer than three lines. A block
//! that has all three parts but an unreadable timing line is an error: silently skipping it would
//! shift every later cue's position in the run. Writing lives in [`crate::srt_encoder`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cue::{SourceCue, sort_by_start};
use crate::{Error, Result};

/// Read a subtitle file and prepare its cues for alignment.
///
/// Cues come back sorted by start time with overlaps separated (see [`separate_overlaps`]).
/// A file that yields no cues is an error, so callers can stop before any expensive work.
pub fn read_source_cues(path: impl AsRef<Path>, min_gap: f64) -> Result<Vec<SourceCue>> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)?;

    let mut cues = parse_cues(&input)?;
    if cues.is_empty() {
        return Err(Error::NoCues {
            path: path.to_path_buf(),
        });
    }

    separate_overlaps(&mut cues, min_gap);
    Ok(cues)
}

/// Parse every well-formed block in file order.
pub fn parse_cues(input: &str) -> Result<Vec<SourceCue>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut cues = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            flush_block(&mut block, &mut cues)?;
        } else {
            block.push((idx + 1, line));
        }
    }
    flush_block(&mut block, &mut cues)?;

    Ok(cues)
}

fn flush_block(block: &mut Vec<(usize, &str)>, cues: &mut Vec<SourceCue>) -> Result<()> {
    if block.is_empty() {
        return Ok(());
    }

    if block.len() < 3 {
        debug!(
            line = block[0].0,
            lines = block.len(),
            "dropping subtitle block with fewer than 3 lines"
        );
        block.clear();
        return Ok(());
    }

    let (_, index_line) = block[0];
    let (timing_line_no, timing_line) = block[1];

    let (start, end) = parse_timing_line(timing_line).map_err(|reason| Error::Subtitle {
        line: timing_line_no,
        reason,
    })?;

    let index = index_line.trim().parse().unwrap_or(cues.len() + 1);
    let text = block[2..]
        .iter()
        .map(|(_, line)| line.trim())
        .collect::<Vec<_>>()
        .join("\n");

    cues.push(SourceCue::new(index, text, start, end));
    block.clear();
    Ok(())
}

fn parse_timing_line(line: &str) -> std::result::Result<(f64, f64), String> {
    let (start, rest) = line
        .split_once("-->")
        .ok_or_else(|| format!("expected 'start --> end', got '{line}'"))?;

    // Some writers append position hints after the end time (`X1:... Y1:...`).
    let end = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| format!("missing end time in '{line}'"))?;

    Ok((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// Parse `HH:MM:SS,mmm` into seconds.
pub fn parse_timestamp(s: &str) -> std::result::Result<f64, String> {
    let invalid = || format!("invalid timestamp '{s}'");

    let mut parts = s.split(':');
    let (Some(h), Some(m), Some(rest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let (sec, frac) = match rest.split_once(&[',', '.'][..]) {
        Some((sec, frac)) => (sec, frac),
        None => (rest, ""),
    };

    let hours: u64 = h.trim().parse().map_err(|_| invalid())?;
    let minutes: u64 = m.parse().map_err(|_| invalid())?;
    let seconds: u64 = sec.parse().map_err(|_| invalid())?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let millis = match frac.len() {
        0 => 0,
        1..=3 if frac.bytes().all(|b| b.is_ascii_digit()) => {
            let digits: u64 = frac.parse().map_err(|_| invalid())?;
            digits * 10u64.pow(3 - frac.len() as u32)
        }
        _ => return Err(invalid()),
    };

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

/// Format seconds as `HH:MM:SS,mmm`, rounding to the nearest millisecond.
///
/// Negative and non-finite inputs clamp to zero.
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };
    let total_ms = (seconds * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Sort cues by start and push any cue that starts before its predecessor ends to
/// `predecessor.end + min_gap`.
///
/// A cue pushed past its own end collapses to zero duration at the new start; the
/// reconciler's duration floor gives it a real length later.
pub fn separate_overlaps(cues: &mut [SourceCue], min_gap: f64) {
    sort_by_start(cues, |c| c.start);

    let mut adjusted = 0usize;
    for i in 1..cues.len() {
        let prev_end = cues[i - 1].end;
        let cue = &mut cues[i];
        if cue.start < prev_end {
            cue.start = prev_end + min_gap;
            cue.end = cue.end.max(cue.start);
            cue.duration = cue.end - cue.start;
            adjusted += 1;
        }
    }

    if adjusted > 0 {
        debug!(adjusted, "separated overlapping source cues");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_round_trip_to_the_millisecond() -> anyhow::Result<()> {
        for s in [
            "00:00:00,000",
            "00:00:01,235",
            "01:02:03,004",
            "10:59:59,999",
        ] {
            let secs = parse_timestamp(s).map_err(anyhow::Error::msg)?;
            assert_eq!(format_timestamp(secs), s);
        }
        Ok(())
    }

    #[test]
    fn accepts_period_and_short_fractions() -> anyhow::Result<()> {
        assert_eq!(
            parse_timestamp("00:00:01.5").map_err(anyhow::Error::msg)?,
            1.5
        );
        assert_eq!(
            parse_timestamp("00:01:00").map_err(anyhow::Error::msg)?,
            60.0
        );
        Ok(())
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for s in [
            "",
            "1:2",
            "00:61:00,000",
            "00:00:00,1234",
            "aa:00:00,000",
            "0:0:0:0",
        ] {
            assert!(parse_timestamp(s).is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn format_rounds_and_clamps() {
        assert_eq!(format_timestamp(0.0004), "00:00:00,000");
        assert_eq!(format_timestamp(0.0005), "00:00:00,001");
        assert_eq!(format_timestamp(1.9995), "00:00:02,000");
        assert_eq!(format_timestamp(-3.0), "00:00:00,000");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00,000");
        assert_eq!(format_timestamp(3_723.5), "01:02:03,500");
    }

    #[test]
    fn parses_blocks_and_drops_short_ones() -> anyhow::Result<()> {
        let input = "\u{feff}1\r\n00:00:00,000 --> 00:00:02,000\r\nhello world\r\n\r\n\
                     2\n00:00:02,000 --> 00:00:03,000\n\n\
                     3\n00:00:02,000 --> 00:00:04,000 X1:10 X2:20\ngoodbye\nnow\n";
        let cues = parse_cues(input)?;

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0], SourceCue::new(1, "hello world", 0.0, 2.0));
        assert_eq!(cues[1].index, 3);
        assert_eq!(cues[1].text, "goodbye\nnow");
        assert_eq!(cues[1].duration, 2.0);
        Ok(())
    }

    #[test]
    fn whitespace_only_lines_separate_blocks() -> anyhow::Result<()> {
        let input =
            "1\n00:00:00,000 --> 00:00:01,000\na\n   \n2\n00:00:01,000 --> 00:00:02,000\nb\n";
        assert_eq!(parse_cues(input)?.len(), 2);
        Ok(())
    }

    #[test]
    fn bad_timing_line_reports_its_line_number() {
        let input = "1\n00:00:00,000 --> 00:00:01,000\na\n\n2\nnot a timing line\nb\n";
        match parse_cues(input) {
            Err(Error::Subtitle { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected a subtitle error, got {other:?}"),
        }
    }

    #[test]
    fn separates_overlaps_after_sorting() {
        let mut cues = vec![
            SourceCue::new(1, "b", 1.0, 3.0),
            SourceCue::new(2, "a", 0.0, 2.0),
            SourceCue::new(3, "c", 2.5, 2.8),
        ];
        separate_overlaps(&mut cues, 0.05);

        assert_eq!(cues[0].text, "a");
        assert!((cues[1].start - 2.05).abs() < 1e-9);
        assert_eq!(cues[1].end, 3.0);
        assert!((cues[1].duration - 0.95).abs() < 1e-9);

        // Pushed past its own end: collapses to zero length at the new start.
        assert!((cues[2].start - 3.05).abs() < 1e-9);
        assert_eq!(cues[2].end, cues[2].start);
        assert_eq!(cues[2].duration, 0.0);
    }

    #[test]
    fn touching_cues_are_left_alone() {
        let mut cues = vec![
            SourceCue::new(1, "a", 0.0, 2.0),
            SourceCue::new(2, "b", 2.0, 4.0),
        ];
        separate_overlaps(&mut cues, 0.05);
        assert_eq!(cues[1].start, 2.0);
    }
}
