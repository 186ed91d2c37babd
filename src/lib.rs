pub mod align;
pub mod config;
pub mod discover;
pub mod error;
pub mod pipeline;
pub mod subtitle;
pub mod transliterate;

pub use config::Config;
pub use error::{Result, TrisubError};
pub use pipeline::{print_summary, process_pair, BatchSummary, Driver, DriverConfig, PairStats};
