use std::fs;

use cuesync::srt::{format_timestamp, parse_timestamp, read_source_cues};
use cuesync::{AlignedCue, Error, OutputType, write_output};

const SOURCE: &str = "\u{feff}1\r\n\
00:00:04,000 --> 00:00:06,000\r\n\
Second in time,\r\n\
first in the file.\r\n\
\r\n\
2\r\n\
00:00:01,000 --> 00:00:03,000\r\n\
The opening line.\r\n\
\r\n\
3\r\n\
only two lines here\r\n\
\r\n\
4\r\n\
00:00:05,500 --> 00:00:07,000\r\n\
Overlaps the first cue.\r\n";

#[test]
fn reads_sorts_and_separates_cues_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("source.srt");
    fs::write(&path, SOURCE)?;

    let cues = read_source_cues(&path, 0.05)?;

    // The two-line block is dropped without an error.
    assert_eq!(cues.len(), 3);

    assert_eq!(cues[0].index, 2);
    assert_eq!(cues[0].text, "The opening line.");
    assert_eq!(cues[1].text, "Second in time,\nfirst in the file.");

    // The overlapping cue now starts just after its predecessor.
    assert!((cues[2].start - 6.05).abs() < 1e-9);
    assert!((cues[2].duration - (7.0 - 6.05)).abs() < 1e-9);
    Ok(())
}

#[test]
fn file_without_cues_is_an_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.srt");
    fs::write(&path, "1\nnot enough\n\n\n")?;

    let err = read_source_cues(&path, 0.05).unwrap_err();
    assert!(matches!(err, Error::NoCues { .. }), "{err}");
    Ok(())
}

#[test]
fn malformed_timing_line_reports_its_line_number() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.srt");
    fs::write(
        &path,
        "1\n00:00:01,000 --> 00:00:02,000\nfine\n\n2\n00:00:xx,000 --> 00:00:03,000\nbroken\n",
    )?;

    match read_source_cues(&path, 0.05) {
        Err(Error::Subtitle { line, .. }) => assert_eq!(line, 6),
        other => panic!("expected a subtitle error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn written_cues_read_back_with_the_same_timing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("aligned.srt");

    let cues = vec![
        AlignedCue {
            start: 12.5,
            end: 14.25,
            text: "later".to_owned(),
        },
        AlignedCue {
            start: 0.001,
            end: 1.999,
            text: "two\nlines".to_owned(),
        },
    ];
    write_output(&path, &cues, OutputType::Srt)?;

    let read = read_source_cues(&path, 0.05)?;
    assert_eq!(read.len(), 2);
    assert_eq!(read[0].index, 1);
    assert_eq!(read[0].text, "two\nlines");
    assert_eq!(format_timestamp(read[0].start), "00:00:00,001");
    assert_eq!(format_timestamp(read[1].end), "00:00:14,250");
    Ok(())
}

#[test]
fn timestamp_strings_survive_parse_and_format() -> anyhow::Result<()> {
    for s in ["00:00:00,000", "00:00:59,999", "00:59:59,001", "99:00:00,500"] {
        let seconds = parse_timestamp(s).map_err(anyhow::Error::msg)?;
        assert_eq!(format_timestamp(seconds), s);
    }
    Ok(())
}
