// SRT subtitle format
use super::{Cue, MergedCue};
use crate::error::{Result, TrisubError};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn block_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid block separator regex"))
}

/// Parse an SRT track into cues, in file order.
///
/// Blocks with fewer than three lines, or whose timing line does not split
/// into exactly two timestamps, are skipped. A malformed timestamp inside an
/// otherwise valid timing line is an error for the whole track, as is a track
/// without a single usable block.
pub fn parse_srt(content: &str) -> Result<Vec<Cue>> {
    let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");

    let mut cues = Vec::new();
    for block in block_separator().split(normalized.trim()) {
        let lines: Vec<&str> = block.trim().lines().map(str::trim_end).collect();
        if lines.len() < 3 {
            continue;
        }

        let times: Vec<&str> = lines[1].trim().split(" --> ").collect();
        let [start, end] = *times.as_slice() else {
            continue;
        };

        cues.push(Cue {
            index: lines[0].trim().to_string(),
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
            text: lines[2..].join("\n"),
        });
    }

    if cues.is_empty() {
        return Err(TrisubError::MalformedTrack(
            "no valid subtitle blocks found".to_string(),
        ));
    }

    Ok(cues)
}

/// Parse an `HH:MM:SS,mmm` timestamp.
pub fn parse_timestamp(value: &str) -> Result<Duration> {
    let value = value.trim();
    let invalid = |reason: &str| TrisubError::Timestamp {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = value.split(':').collect();
    let [hours, minutes, rest] = *fields.as_slice() else {
        return Err(invalid("expected HH:MM:SS,mmm"));
    };
    let (seconds, millis) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing ',' before milliseconds"))?;

    let number = |field: &str, name: &str| -> Result<u64> {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(&format!("bad {}", name)));
        }
        field.parse().map_err(|_| invalid(&format!("{} out of range", name)))
    };

    let (hours, minutes) = (number(hours, "hours")?, number(minutes, "minutes")?);
    let (seconds, millis) = (number(seconds, "seconds")?, number(millis, "milliseconds")?);

    let out_of_range = || invalid("timestamp out of range");
    let total_secs = hours
        .checked_mul(3600)
        .zip(minutes.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|secs| secs.checked_add(seconds))
        .ok_or_else(out_of_range)?;

    Duration::from_secs(total_secs)
        .checked_add(Duration::from_millis(millis))
        .ok_or_else(out_of_range)
}

/// Format a duration as an `HH:MM:SS,mmm` timestamp.
pub fn format_timestamp(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = d.subsec_millis();
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

pub struct SrtFormatter;

impl SrtFormatter {
    /// Render merged cues as trilingual SRT: primary line, transliteration
    /// line, then the translation block.
    pub fn format(&self, cues: &[MergedCue]) -> String {
        let mut output = String::new();

        for cue in cues {
            output.push_str(&format!(
                "{}\n{} --> {}\n{}\n{}\n{}\n\n",
                cue.index,
                format_timestamp(cue.start),
                format_timestamp(cue.end),
                cue.primary_text,
                cue.transliteration,
                cue.secondary_text
            ));
        }

        output
    }

    /// Render plain cues, keeping their original index labels.
    pub fn format_cues(&self, cues: &[Cue]) -> String {
        cues.iter()
            .map(|cue| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    cue.index,
                    format_timestamp(cue.start),
                    format_timestamp(cue.end),
                    cue.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
