use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrisubError {
    #[error("Malformed subtitle track: {0}")]
    MalformedTrack(String),

    #[error("Invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TrisubError>;
