//! Timestamp-overlap alignment of two independently segmented cue tracks.
//!
//! Both tracks are assumed to be ordered by time. The aligner walks the
//! secondary track with a cursor that only ever moves forward, so aligning a
//! whole track is linear in the combined number of cues rather than quadratic.

use crate::subtitle::Cue;
use std::time::Duration;

/// A primary cue paired with its best-overlapping secondary cue, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment<'a> {
    pub primary: &'a Cue,
    pub secondary: Option<&'a Cue>,
}

/// Length of the intersection of two cues' intervals; zero when they are
/// disjoint or only touch.
pub fn overlap(a: &Cue, b: &Cue) -> Duration {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    end.saturating_sub(start)
}

/// Forward-scanning matcher over a secondary track.
#[derive(Debug, Clone)]
pub struct OverlapAligner<'a> {
    secondary: &'a [Cue],
    cursor: usize,
}

impl<'a> OverlapAligner<'a> {
    pub fn new(secondary: &'a [Cue]) -> Self {
        Self {
            secondary,
            cursor: 0,
        }
    }

    /// Index into the secondary track where the next search starts.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Find the secondary cue overlapping `primary` the most.
    ///
    /// Only strictly positive overlaps count, and on equal overlaps the first
    /// cue scanned wins. The scan stops at the first secondary cue starting
    /// after `primary` ends. The cursor moves to the matched cue (not past it,
    /// so one secondary cue can serve several consecutive primary cues) and
    /// stays put when nothing matches.
    pub fn next_match(&mut self, primary: &Cue) -> Option<&'a Cue> {
        let mut best_overlap = Duration::ZERO;
        let mut best: Option<(usize, &'a Cue)> = None;

        for (i, candidate) in self.secondary.iter().enumerate().skip(self.cursor) {
            let amount = overlap(primary, candidate);
            if amount > best_overlap {
                best_overlap = amount;
                best = Some((i, candidate));
            }

            if candidate.start > primary.end {
                break;
            }
        }

        let (index, cue) = best?;
        self.cursor = index;
        Some(cue)
    }
}

/// Pair every primary cue with its best-overlapping secondary cue.
///
/// The result has exactly one entry per primary cue, in primary order.
pub fn align<'a>(primary: &'a [Cue], secondary: &'a [Cue]) -> Vec<Alignment<'a>> {
    let mut aligner = OverlapAligner::new(secondary);

    primary
        .iter()
        .map(|cue| Alignment {
            primary: cue,
            secondary: aligner.next_match(cue),
        })
        .collect()
}
