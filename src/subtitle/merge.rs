use super::{Cue, MergedCue};
use crate::align::Alignment;
use crate::transliterate::Transliterator;

/// Builds trilingual cues, numbering them densely from 1.
pub struct Merger<'t> {
    transliterator: &'t dyn Transliterator,
    no_match_text: String,
    next_index: usize,
}

impl<'t> Merger<'t> {
    pub fn new(transliterator: &'t dyn Transliterator, no_match_text: impl Into<String>) -> Self {
        Self {
            transliterator,
            no_match_text: no_match_text.into(),
            next_index: 1,
        }
    }

    /// Merge one primary cue with its matched translation, if any.
    ///
    /// Timing is always taken from the primary cue.
    pub fn merge(&mut self, primary: &Cue, secondary: Option<&Cue>) -> MergedCue {
        let primary_text = flatten(&primary.text);
        let transliteration = self.transliterator.transliterate(&primary_text);
        let secondary_text = match secondary {
            Some(cue) => cue.text.clone(),
            None => self.no_match_text.clone(),
        };

        let index = self.next_index;
        self.next_index += 1;

        MergedCue {
            index,
            start: primary.start,
            end: primary.end,
            primary_text,
            transliteration,
            secondary_text,
        }
    }

    pub fn merge_all(&mut self, alignments: &[Alignment<'_>]) -> Vec<MergedCue> {
        alignments
            .iter()
            .map(|a| self.merge(a.primary, a.secondary))
            .collect()
    }
}

/// Join multi-line text into one display line.
fn flatten(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}
