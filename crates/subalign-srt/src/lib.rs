//! SRT subtitle reading and writing
//!
//! Parses SubRip cue files into millisecond-stamped [`Track`]s and
//! serializes them back. Parsing is lenient where players are lenient
//! (CRLF, missing index lines, `.` as the millisecond separator); writing
//! always emits canonical SRT.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use subalign_types::{Fragment, Track};
use thiserror::Error;

/// SRT parse failure, with the 1-based line it occurred on
#[derive(Debug, Error)]
pub enum SrtError {
    #[error("line {line}: malformed timing line '{text}'")]
    MalformedTiming { line: usize, text: String },
    #[error("line {line}: malformed timestamp '{text}'")]
    MalformedTimestamp { line: usize, text: String },
    #[error("line {line}: cue timing without text")]
    MissingCueText { line: usize },
}

/// Parse SRT content into a track
pub fn parse_srt(content: &str) -> Result<Track, SrtError> {
    let mut fragments = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        // A bare number is the cue counter; the timing line follows.
        let (timing_index, timing_line) = if line.chars().all(|c| c.is_ascii_digit()) {
            match lines.next() {
                Some((next_index, next_raw)) => (next_index, next_raw.trim().to_string()),
                None => break, // trailing counter with no cue
            }
        } else {
            (index, line.to_string())
        };

        let (start_ms, end_ms) = parse_timing_line(&timing_line, timing_index + 1)?;

        let mut text_lines: Vec<String> = Vec::new();
        for (_, text_raw) in lines.by_ref() {
            let text_line = text_raw.trim();
            if text_line.is_empty() {
                break;
            }
            text_lines.push(text_line.to_string());
        }
        if text_lines.is_empty() {
            return Err(SrtError::MissingCueText {
                line: timing_index + 1,
            });
        }

        fragments.push(Fragment::new(text_lines.join("\n"), start_ms, end_ms));
    }

    tracing::debug!("parsed {} cues", fragments.len());
    Ok(Track::new(fragments))
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm`, ignoring trailing cue settings
fn parse_timing_line(line: &str, line_number: usize) -> Result<(f64, f64), SrtError> {
    let mut parts = line.split_whitespace();
    let (start, arrow, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(arrow), Some(end)) => (start, arrow, end),
        _ => {
            return Err(SrtError::MalformedTiming {
                line: line_number,
                text: line.to_string(),
            })
        }
    };
    if arrow != "-->" {
        return Err(SrtError::MalformedTiming {
            line: line_number,
            text: line.to_string(),
        });
    }

    let start_ms = parse_timestamp(start).ok_or_else(|| SrtError::MalformedTimestamp {
        line: line_number,
        text: start.to_string(),
    })?;
    let end_ms = parse_timestamp(end).ok_or_else(|| SrtError::MalformedTimestamp {
        line: line_number,
        text: end.to_string(),
    })?;

    Ok((start_ms, end_ms))
}

/// `HH:MM:SS,mmm` (or `.` before the milliseconds) to milliseconds
fn parse_timestamp(text: &str) -> Option<f64> {
    let normalized = text.replace('.', ",");
    let (clock, millis) = normalized.rsplit_once(',')?;

    let mut clock_parts = clock.split(':');
    let hours: u64 = clock_parts.next()?.parse().ok()?;
    let minutes: u64 = clock_parts.next()?.parse().ok()?;
    let seconds: u64 = clock_parts.next()?.parse().ok()?;
    if clock_parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;
    if millis >= 1000 {
        return None;
    }

    Some((((hours * 60 + minutes) * 60 + seconds) * 1000 + millis) as f64)
}

/// Serialize a track as canonical SRT, renumbering cues from 1
pub fn format_srt(track: &Track) -> String {
    let mut out = String::new();
    for (i, fragment) in track.fragments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(fragment.start_ms),
            format_timestamp(fragment.end_ms),
            fragment.text.trim()
        ));
    }
    out
}

/// Milliseconds to `HH:MM:SS,mmm`
fn format_timestamp(ms: f64) -> String {
    let total_ms = ms.round().max(0.0) as u64;
    let millis = total_ms % 1000;
    let seconds = (total_ms / 1000) % 60;
    let minutes = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Read and parse an SRT file
pub fn load_track(path: &Path) -> Result<Track> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let track =
        parse_srt(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(track)
}

/// Serialize and write a track as an SRT file
pub fn save_track(path: &Path, track: &Track) -> Result<()> {
    fs::write(path, format_srt(track))
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1
00:00:00,000 --> 00:00:01,500
Hello there

2
00:00:02,000 --> 00:00:03,250
General
Kenobi
";

    #[test]
    fn parses_basic_cues() {
        let track = parse_srt(SAMPLE).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.fragments[0].text, "Hello there");
        assert_eq!(track.fragments[0].start_ms, 0.0);
        assert_eq!(track.fragments[0].end_ms, 1500.0);
        assert_eq!(track.fragments[1].text, "General\nKenobi");
        assert_eq!(track.fragments[1].start_ms, 2000.0);
        assert_eq!(track.fragments[1].end_ms, 3250.0);
    }

    #[test]
    fn tolerates_crlf_missing_index_and_dot_millis() {
        let content = "00:00:00.100 --> 00:00:01.200\r\nfirst\r\n\r\n2\r\n00:01:00,000 --> 00:01:02,000\r\nsecond\r\n";
        let track = parse_srt(content).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.fragments[0].start_ms, 100.0);
        assert_eq!(track.fragments[1].start_ms, 60_000.0);
    }

    #[test]
    fn parses_hours_and_ignores_trailing_settings() {
        let content = "1\n01:02:03,004 --> 01:02:04,005 X1:0 X2:100\ncue text\n";
        let track = parse_srt(content).unwrap();
        assert_eq!(track.fragments[0].start_ms, 3_723_004.0);
        assert_eq!(track.fragments[0].end_ms, 3_724_005.0);
    }

    #[test]
    fn malformed_timestamp_reports_line_number() {
        let content = "1\n00:00:aa,000 --> 00:00:01,000\ntext\n";
        let err = parse_srt(content).unwrap_err();
        assert!(matches!(err, SrtError::MalformedTimestamp { line: 2, .. }));
    }

    #[test]
    fn cue_without_text_is_an_error() {
        let content = "1\n00:00:00,000 --> 00:00:01,000\n\n2\n00:00:02,000 --> 00:00:03,000\nok\n";
        let err = parse_srt(content).unwrap_err();
        assert!(matches!(err, SrtError::MissingCueText { line: 2 }));
    }

    #[test]
    fn empty_input_is_an_empty_track() {
        assert!(parse_srt("").unwrap().is_empty());
        assert!(parse_srt("\n\n\n").unwrap().is_empty());
    }

    #[test]
    fn format_round_trips() {
        let track = parse_srt(SAMPLE).unwrap();
        let formatted = format_srt(&track);
        let reparsed = parse_srt(&formatted).unwrap();
        assert_eq!(reparsed, track);
    }

    #[test]
    fn format_renumbers_and_trims() {
        let track = Track::new(vec![Fragment::new("  hello world  ", 0.0, 1000.0)]);
        let formatted = format_srt(&track);
        assert_eq!(formatted, "1\n00:00:00,000 --> 00:00:01,000\nhello world\n\n");
    }

    #[test]
    fn timestamp_formatting_rolls_over() {
        assert_eq!(format_timestamp(3_723_004.0), "01:02:03,004");
        assert_eq!(format_timestamp(59_999.6), "00:01:00,000");
        assert_eq!(format_timestamp(-5.0), "00:00:00,000");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let track = Track::new(vec![
            Fragment::new("one", 0.0, 500.0),
            Fragment::new("two", 800.0, 1200.0),
        ]);
        save_track(&path, &track).unwrap();
        let loaded = load_track(&path).unwrap();
        assert_eq!(loaded, track);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_track(Path::new("/nonexistent/sub.srt")).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read"));
    }
}
