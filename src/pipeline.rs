use crate::align::align;
use crate::config::Config;
use crate::discover::{find_subtitle_pairs, SubtitlePair, SuffixRules};
use crate::error::Result;
use crate::subtitle::{parse_srt, Merger, SrtFormatter};
use crate::transliterate::Transliterator;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Configuration for the batch/watch driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Directory scanned for subtitle pairs.
    pub directory: PathBuf,
    /// How the two tracks of a pair are recognized.
    pub suffixes: SuffixRules,
    /// Translation text used when no secondary cue overlaps.
    pub no_match_text: String,
    /// Reprocess pairs even if their output file exists.
    pub force: bool,
    /// Show a progress bar over the pairs of a pass.
    pub show_progress: bool,
}

impl DriverConfig {
    pub fn from_config(directory: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            directory: directory.into(),
            suffixes: SuffixRules::from_config(config),
            no_match_text: config.no_match_text.clone(),
            force: false,
            show_progress: false,
        }
    }
}

/// Statistics for one processed pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairStats {
    pub output_path: PathBuf,
    pub primary_cues: usize,
    pub secondary_cues: usize,
    pub merged_cues: usize,
    /// Merged cues that received the no-match text.
    pub unmatched: usize,
}

/// Outcome of one discovery-and-process pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub found: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Pairs that were attempted this pass.
    pub fn attempted(&self) -> usize {
        self.processed + self.failed
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run parse, align, merge and serialize for one pair, then write the output.
///
/// Nothing is written unless every stage succeeded, so a failed pair has no
/// output file and is picked up again on a later pass.
pub fn process_pair(
    pair: &SubtitlePair,
    output: &Path,
    transliterator: &dyn Transliterator,
    no_match_text: &str,
) -> Result<PairStats> {
    info!(
        "Processing: {} + {}",
        display_name(&pair.primary),
        display_name(&pair.secondary)
    );

    let primary = parse_srt(&fs::read_to_string(&pair.primary)?)?;
    info!("  Found {} primary entries", primary.len());

    let secondary = parse_srt(&fs::read_to_string(&pair.secondary)?)?;
    info!("  Found {} secondary entries", secondary.len());

    let alignments = align(&primary, &secondary);
    let unmatched = alignments.iter().filter(|a| a.secondary.is_none()).count();
    debug!(
        "  Aligned {} entries ({} without translation)",
        alignments.len(),
        unmatched
    );

    let merged = Merger::new(transliterator, no_match_text).merge_all(&alignments);
    info!("  Merged {} subtitle entries", merged.len());

    fs::write(output, SrtFormatter.format(&merged))?;
    info!("  Created: {}", display_name(output));

    Ok(PairStats {
        output_path: output.to_path_buf(),
        primary_cues: primary.len(),
        secondary_cues: secondary.len(),
        merged_cues: merged.len(),
        unmatched,
    })
}

/// Discovers pairs and processes each one not yet handled.
///
/// The set of processed pairs lives in memory only; after a restart the
/// existence of the output file is the only record of earlier work.
pub struct Driver {
    config: DriverConfig,
    transliterator: Box<dyn Transliterator>,
    processed: HashSet<(PathBuf, PathBuf)>,
}

impl Driver {
    pub fn new(config: DriverConfig, transliterator: Box<dyn Transliterator>) -> Self {
        Self {
            config,
            transliterator,
            processed: HashSet::new(),
        }
    }

    /// Number of pairs processed successfully during this run.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    fn should_skip(&self, pair: &SubtitlePair, output: &Path) -> bool {
        let key = (pair.primary.clone(), pair.secondary.clone());
        if self.processed.contains(&key) {
            return true;
        }
        !self.config.force && output.exists()
    }

    /// Run a single discovery-and-process pass.
    ///
    /// Only discovery errors (e.g. the directory vanished) are returned; a
    /// failing pair is logged and counted, and the pass moves on.
    pub fn run_once(&mut self) -> Result<BatchSummary> {
        let start = Instant::now();
        let pairs = find_subtitle_pairs(&self.config.directory, &self.config.suffixes)?;

        let mut summary = BatchSummary {
            found: pairs.len(),
            ..Default::default()
        };

        let progress = (self.config.show_progress && !pairs.is_empty()).then(|| {
            let pb = ProgressBar::new(pairs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        });

        for pair in &pairs {
            if let Some(pb) = &progress {
                pb.set_message(pair.base_name.clone());
            }

            let output = pair.output_path(&self.config.suffixes.extension);
            if self.should_skip(pair, &output) {
                debug!("Skipping {}: already processed", pair.base_name);
                summary.skipped += 1;
            } else {
                match process_pair(
                    pair,
                    &output,
                    self.transliterator.as_ref(),
                    &self.config.no_match_text,
                ) {
                    Ok(_) => {
                        self.processed
                            .insert((pair.primary.clone(), pair.secondary.clone()));
                        summary.processed += 1;
                    }
                    Err(e) => {
                        error!("  Error processing {}: {}", display_name(&pair.primary), e);
                        summary.failed += 1;
                    }
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    /// Run passes every `interval` until `shutdown` receives a message or its
    /// sender is dropped.
    ///
    /// A pass that fails to scan the directory is logged and retried on the
    /// next tick. The shutdown channel is only consulted between passes; a pass
    /// that is underway always runs to the end.
    pub fn watch(&mut self, interval: Duration, shutdown: &Receiver<()>) {
        info!("Watching directory: {}", self.config.directory.display());
        info!("Check interval: {} seconds", interval.as_secs());

        loop {
            match self.run_once() {
                Ok(summary) if summary.attempted() > 0 => info!(
                    "Pass complete: {} processed, {} failed",
                    summary.processed, summary.failed
                ),
                Ok(_) => {}
                Err(e) => error!("Scan of {} failed: {}", self.config.directory.display(), e),
            }

            match shutdown.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!("Stopping watcher...");
    }
}

/// One-line outcome of a pass, without styling.
fn summary_headline(summary: &BatchSummary) -> String {
    if summary.attempted() == 0 {
        format!(
            "Nothing to do: all {} pair(s) already have output",
            summary.skipped
        )
    } else {
        format!(
            "Processed {}/{} pairs successfully",
            summary.processed,
            summary.attempted()
        )
    }
}

/// Print a summary of a one-shot run.
pub fn print_summary(summary: &BatchSummary) {
    let marker = if summary.failed == 0 {
        style("✓").green()
    } else {
        style("!").yellow()
    };

    println!();
    println!("{} {}", marker, summary_headline(summary));
    if summary.skipped > 0 && summary.attempted() > 0 {
        println!("  Skipped:  {} (output already exists)", summary.skipped);
    }
    if summary.failed > 0 {
        println!("  Failed:   {}", style(summary.failed).red());
    }
    println!("  Time:     {:.2}s", summary.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_config_from_config() {
        let config = Config::default();
        let driver_config = DriverConfig::from_config("/media", &config);

        assert_eq!(driver_config.directory, PathBuf::from("/media"));
        assert_eq!(driver_config.suffixes.extension, "srt");
        assert_eq!(driver_config.no_match_text, "[No English subtitle]");
        assert!(!driver_config.force);
        assert!(!driver_config.show_progress);
    }

    #[test]
    fn test_batch_summary_attempted() {
        let summary = BatchSummary {
            found: 5,
            processed: 2,
            skipped: 2,
            failed: 1,
            elapsed: Duration::from_secs(1),
        };
        assert_eq!(summary.attempted(), 3);
    }

    #[test]
    fn test_summary_headline() {
        let mixed = BatchSummary {
            found: 4,
            processed: 2,
            skipped: 1,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(summary_headline(&mixed), "Processed 2/3 pairs successfully");

        let all_skipped = BatchSummary {
            found: 3,
            skipped: 3,
            ..Default::default()
        };
        assert_eq!(
            summary_headline(&all_skipped),
            "Nothing to do: all 3 pair(s) already have output"
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/Movie.chs.srt")), "Movie.chs.srt");
    }
}
