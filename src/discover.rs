use crate::config::Config;
use crate::error::{Result, TrisubError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source and translation tracks sharing a base name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubtitlePair {
    pub base_name: String,
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

impl SubtitlePair {
    /// Output path: `<dir>/<base_name>.<extension>` next to the primary track.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        let dir = self.primary.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("{}.{}", self.base_name, extension))
    }
}

/// Suffix tags used to recognize the two tracks of a pair.
#[derive(Debug, Clone)]
pub struct SuffixRules {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub extension: String,
}

impl SuffixRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary: config.primary_suffixes.clone(),
            secondary: config.secondary_suffixes.clone(),
            extension: config.extension.clone(),
        }
    }
}

impl Default for SuffixRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Strip the first `.<tag>.<extension>` suffix that matches, returning the
/// tag's position in `tags` and the remaining base name.
fn strip_tagged<'n>(
    name: &'n str,
    tags: &[String],
    extension: &str,
) -> Option<(usize, &'n str)> {
    tags.iter().enumerate().find_map(|(rank, tag)| {
        let suffix = format!(".{}.{}", tag, extension);
        name.strip_suffix(suffix.as_str())
            .filter(|base| !base.is_empty())
            .map(|base| (rank, base))
    })
}

/// Find source/translation pairs in `dir` (non-recursive).
///
/// When several translation tracks share a base name, the one whose tag
/// comes first in the configured order wins. Pairs are sorted by base name.
pub fn find_subtitle_pairs(dir: &Path, rules: &SuffixRules) -> Result<Vec<SubtitlePair>> {
    if !dir.is_dir() {
        return Err(TrisubError::NotADirectory(dir.display().to_string()));
    }

    let mut primaries: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
    let mut secondaries: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks, which media libraries use for shared tracks
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!("Skipping non UTF-8 file name: {:?}", file_name);
            continue;
        };

        let (found, rank, base) =
            if let Some((rank, base)) = strip_tagged(name, &rules.primary, &rules.extension) {
                (&mut primaries, rank, base)
            } else if let Some((rank, base)) =
                strip_tagged(name, &rules.secondary, &rules.extension)
            {
                (&mut secondaries, rank, base)
            } else {
                continue;
            };

        let replace = found
            .get(base)
            .map_or(true, |(existing, _)| rank < *existing);
        if replace {
            found.insert(base.to_string(), (rank, entry.path()));
        }
    }

    let pairs: Vec<SubtitlePair> = primaries
        .into_iter()
        .filter_map(|(base_name, (_, primary))| {
            let (_, secondary) = secondaries.get(&base_name)?;
            Some(SubtitlePair {
                secondary: secondary.clone(),
                base_name,
                primary,
            })
        })
        .collect();

    debug!("Discovered {} subtitle pair(s) in {:?}", pairs.len(), dir);
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_strip_tagged() {
        let tags = vec!["chs".to_string(), "zh".to_string()];
        assert_eq!(strip_tagged("Movie.chs.srt", &tags, "srt"), Some((0, "Movie")));
        assert_eq!(strip_tagged("Movie.zh.srt", &tags, "srt"), Some((1, "Movie")));
        assert_eq!(strip_tagged("Movie.srt", &tags, "srt"), None);
        assert_eq!(strip_tagged(".zh.srt", &tags, "srt"), None);
        assert_eq!(strip_tagged("Movie.ZH.srt", &tags, "srt"), None);
    }

    #[test]
    fn test_output_path() {
        let pair = SubtitlePair {
            base_name: "Show S01E01".to_string(),
            primary: PathBuf::from("/media/show/Show S01E01.chs.srt"),
            secondary: PathBuf::from("/media/show/Show S01E01.eng.srt"),
        };
        assert_eq!(
            pair.output_path("srt"),
            PathBuf::from("/media/show/Show S01E01.srt")
        );
    }

    #[test]
    fn test_find_pairs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.zh.srt");
        touch(dir.path(), "b.en.srt");
        touch(dir.path(), "a.chs.srt");
        touch(dir.path(), "a.eng.srt");
        touch(dir.path(), "lonely.chi.srt");
        touch(dir.path(), "a.srt");
        touch(dir.path(), "notes.txt");

        let pairs = find_subtitle_pairs(dir.path(), &SuffixRules::default()).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].base_name, "a");
        assert_eq!(pairs[0].primary, dir.path().join("a.chs.srt"));
        assert_eq!(pairs[0].secondary, dir.path().join("a.eng.srt"));
        assert_eq!(pairs[1].base_name, "b");
    }

    #[test]
    fn test_find_pairs_prefers_earlier_tag() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "m.en.srt");
        touch(dir.path(), "m.eng.srt");
        touch(dir.path(), "m.zho.srt");
        touch(dir.path(), "m.chs.srt");

        let pairs = find_subtitle_pairs(dir.path(), &SuffixRules::default()).unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].primary, dir.path().join("m.chs.srt"));
        assert_eq!(pairs[0].secondary, dir.path().join("m.eng.srt"));
    }

    #[test]
    fn test_find_pairs_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("x.chs.srt")).unwrap();
        touch(dir.path(), "x.eng.srt");

        let pairs = find_subtitle_pairs(dir.path(), &SuffixRules::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_find_pairs_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let store = TempDir::new().unwrap();
        touch(store.path(), "real-zh.srt");
        touch(store.path(), "real-en.srt");

        let dir = TempDir::new().unwrap();
        symlink(store.path().join("real-zh.srt"), dir.path().join("ep.chs.srt")).unwrap();
        symlink(store.path().join("real-en.srt"), dir.path().join("ep.eng.srt")).unwrap();

        let pairs = find_subtitle_pairs(dir.path(), &SuffixRules::default()).unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].primary, dir.path().join("ep.chs.srt"));
        assert_eq!(pairs[0].secondary, dir.path().join("ep.eng.srt"));
    }

    #[test]
    fn test_find_pairs_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.srt");
        touch(dir.path(), "file.srt");

        assert!(matches!(
            find_subtitle_pairs(&file, &SuffixRules::default()),
            Err(TrisubError::NotADirectory(_))
        ));
    }
}
