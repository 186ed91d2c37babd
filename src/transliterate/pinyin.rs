// Mandarin pinyin transliteration
use super::Transliterator;
use crate::config::PinyinStyle;
use ::pinyin::{Pinyin, ToPinyin};

/// Transliterates Han characters to pinyin, one syllable per character.
///
/// Runs of other characters (Latin words, digits, punctuation) are kept as a
/// single token each; whitespace only separates tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinTransliterator {
    style: PinyinStyle,
}

impl PinyinTransliterator {
    pub fn new(style: PinyinStyle) -> Self {
        Self { style }
    }

    fn render(&self, syllable: Pinyin) -> &'static str {
        match self.style {
            PinyinStyle::Tone => syllable.with_tone(),
            PinyinStyle::Number => syllable.with_tone_num_end(),
            PinyinStyle::Plain => syllable.plain(),
        }
    }
}

impl Transliterator for PinyinTransliterator {
    fn transliterate(&self, text: &str) -> String {
        let mut tokens: Vec<String> = Vec::new();
        let mut other = String::new();

        for (ch, syllable) in text.chars().zip(text.to_pinyin()) {
            match syllable {
                Some(syllable) => {
                    flush_token(&mut other, &mut tokens);
                    tokens.push(self.render(syllable).to_string());
                }
                None if ch.is_whitespace() => flush_token(&mut other, &mut tokens),
                None => other.push(ch),
            }
        }
        flush_token(&mut other, &mut tokens);

        tokens.join(" ")
    }

    fn name(&self) -> &'static str {
        "pinyin"
    }
}

fn flush_token(pending: &mut String, tokens: &mut Vec<String>) {
    if !pending.is_empty() {
        tokens.push(std::mem::take(pending));
    }
}
