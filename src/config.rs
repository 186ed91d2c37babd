use crate::error::{Result, TrisubError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How pinyin syllables are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinyinStyle {
    /// Tone marks on the vowel, e.g. `zhōng`.
    #[default]
    Tone,
    /// Trailing tone number, e.g. `zhong1`.
    Number,
    /// No tone information, e.g. `zhong`.
    Plain,
}

impl std::fmt::Display for PinyinStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinyinStyle::Tone => write!(f, "tone"),
            PinyinStyle::Number => write!(f, "number"),
            PinyinStyle::Plain => write!(f, "plain"),
        }
    }
}

impl std::str::FromStr for PinyinStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tone" => Ok(PinyinStyle::Tone),
            "number" => Ok(PinyinStyle::Number),
            "plain" => Ok(PinyinStyle::Plain),
            _ => Err(format!(
                "Unknown pinyin style: {}. Use 'tone', 'number', or 'plain'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Suffix tags marking the source-language (timing authority) track, e.g. `chs`.
    pub primary_suffixes: Vec<String>,
    /// Suffix tags marking the translation track, e.g. `eng`.
    pub secondary_suffixes: Vec<String>,
    /// Subtitle file extension, without the dot.
    pub extension: String,
    /// Poll interval for watch mode, in seconds.
    pub interval_secs: u64,
    /// Text written in place of a translation when no secondary cue overlaps.
    pub no_match_text: String,
    pub pinyin_style: PinyinStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_suffixes: ["chs", "chi", "zh", "zho"].map(String::from).to_vec(),
            secondary_suffixes: ["eng", "en"].map(String::from).to_vec(),
            extension: "srt".to_string(),
            interval_secs: 60,
            no_match_text: "[No English subtitle]".to_string(),
            pinyin_style: PinyinStyle::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents)?;
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tags) = lookup("TRISUB_PRIMARY_SUFFIXES") {
            self.primary_suffixes = split_tags(&tags);
        }
        if let Some(tags) = lookup("TRISUB_SECONDARY_SUFFIXES") {
            self.secondary_suffixes = split_tags(&tags);
        }
        if let Some(interval) = lookup("TRISUB_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.interval_secs = secs;
            }
        }
        if let Some(text) = lookup("TRISUB_NO_MATCH_TEXT") {
            self.no_match_text = text;
        }
        if let Some(style) = lookup("TRISUB_PINYIN_STYLE") {
            if let Ok(s) = style.parse() {
                self.pinyin_style = s;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.primary_suffixes.is_empty() {
            return Err(TrisubError::Config(
                "At least one primary suffix tag is required".to_string(),
            ));
        }
        if self.secondary_suffixes.is_empty() {
            return Err(TrisubError::Config(
                "At least one secondary suffix tag is required".to_string(),
            ));
        }
        if let Some(tag) = self
            .primary_suffixes
            .iter()
            .find(|tag| self.secondary_suffixes.contains(tag))
        {
            return Err(TrisubError::Config(format!(
                "Suffix tag '{}' is listed as both primary and secondary",
                tag
            )));
        }
        if self.extension.is_empty() {
            return Err(TrisubError::Config(
                "Subtitle extension must not be empty".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(TrisubError::Config(
                "Interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trisub").join("config.toml"))
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().trim_start_matches('.'))
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_style_parsing() {
        assert_eq!("tone".parse::<PinyinStyle>().unwrap(), PinyinStyle::Tone);
        assert_eq!("NUMBER".parse::<PinyinStyle>().unwrap(), PinyinStyle::Number);
        assert_eq!("plain".parse::<PinyinStyle>().unwrap(), PinyinStyle::Plain);
        assert!("ipa".parse::<PinyinStyle>().is_err());
    }

    #[test]
    fn test_style_display_parses_back() {
        for style in [PinyinStyle::Tone, PinyinStyle::Number, PinyinStyle::Plain] {
            assert_eq!(style.to_string().parse::<PinyinStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.primary_suffixes, vec!["chs", "chi", "zh", "zho"]);
        assert_eq!(config.secondary_suffixes, vec!["eng", "en"]);
        assert_eq!(config.extension, "srt");
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.pinyin_style, PinyinStyle::Tone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config =
            toml::from_str("interval_secs = 15\npinyin_style = \"plain\"").unwrap();
        assert_eq!(config.interval_secs, 15);
        assert_eq!(config.pinyin_style, PinyinStyle::Plain);
        assert_eq!(config.secondary_suffixes, vec!["eng", "en"]);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TRISUB_PRIMARY_SUFFIXES", "cht, .zh-Hant"),
            ("TRISUB_INTERVAL", "5"),
            ("TRISUB_PINYIN_STYLE", "bogus"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.primary_suffixes, vec!["cht", "zh-Hant"]);
        assert_eq!(config.interval_secs, 5);
        // Unparseable values leave the previous setting alone
        assert_eq!(config.pinyin_style, PinyinStyle::Tone);
    }

    #[test]
    fn test_validate_rejects_shared_tag() {
        let mut config = Config::default();
        config.secondary_suffixes.push("zh".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_suffixes() {
        let config = Config {
            primary_suffixes: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
