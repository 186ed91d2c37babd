use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use trisub::config::{Config, PinyinStyle};
use trisub::transliterate::{PinyinTransliterator, Transliterator};
use trisub::{print_summary, Driver, DriverConfig};

#[derive(Parser)]
#[command(name = "trisub")]
#[command(version, about = "Trilingual subtitle automation")]
#[command(long_about = "Merge Chinese and English subtitle pairs into trilingual subtitles \
(Chinese, pinyin, English), timed to the Chinese track.")]
struct Cli {
    /// Directory containing subtitle files
    directory: PathBuf,

    /// Watch directory for new subtitle pairs
    #[arg(short, long)]
    watch: bool,

    /// Check interval in seconds (default: 60, or the configured value)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Pinyin style: tone, number, plain
    #[arg(long)]
    style: Option<String>,

    /// Regenerate output even if it already exists
    #[arg(long)]
    force: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Validate directory
    if !cli.directory.is_dir() {
        anyhow::bail!("{} is not a valid directory", cli.directory.display());
    }

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    if let Some(ref style) = cli.style {
        config.pinyin_style = style
            .parse::<PinyinStyle>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    config.validate().context("Configuration validation failed")?;

    let mut driver_config = DriverConfig::from_config(&cli.directory, &config);
    driver_config.force = cli.force;
    driver_config.show_progress = !cli.watch && !cli.no_progress;

    let transliterator = PinyinTransliterator::new(config.pinyin_style);
    info!(
        "Transliteration: {} ({})",
        transliterator.name(),
        config.pinyin_style
    );
    let mut driver = Driver::new(driver_config, Box::new(transliterator));

    if cli.watch {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = shutdown_tx.send(());
        })
        .context("Failed to install Ctrl+C handler")?;

        info!("Press Ctrl+C to stop");
        driver.watch(Duration::from_secs(config.interval_secs), &shutdown_rx);
        return Ok(());
    }

    let summary = driver.run_once()?;
    if summary.found == 0 {
        info!("No subtitle pairs found");
        return Ok(());
    }

    info!("Found {} subtitle pair(s)", summary.found);
    print_summary(&summary);

    Ok(())
}
