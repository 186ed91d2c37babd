pub mod pinyin;

pub use self::pinyin::PinyinTransliterator;

/// Renders source-language text phonetically.
///
/// Implementations must be deterministic. Any `Fn(&str) -> String` closure
/// is a transliterator, which keeps merge tests independent of a real
/// romanization table.
pub trait Transliterator {
    fn transliterate(&self, text: &str) -> String;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Transliterator for F
where
    F: Fn(&str) -> String,
{
    fn transliterate(&self, text: &str) -> String {
        self(text)
    }
}
