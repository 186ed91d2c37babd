pub mod merge;
pub mod srt;

pub use merge::Merger;
pub use srt::{format_timestamp, parse_srt, parse_timestamp, SrtFormatter};

use std::time::Duration;

/// One timed unit of subtitle text as read from a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Index label from the source file; only meaningful within that file.
    pub index: String,
    pub start: Duration,
    pub end: Duration,
    /// Display text, lines separated by `\n`.
    pub text: String,
}

/// A cue of the trilingual output track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCue {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
    /// Source-language text on a single line.
    pub primary_text: String,
    /// Transliteration of `primary_text`.
    pub transliteration: String,
    /// Matched translation text (possibly multi-line) or the no-match text.
    pub secondary_text: String,
}
