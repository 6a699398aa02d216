use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running the preprocessing pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Raw recipe file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raw recipe file is not a valid recipe mapping
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Word tokenization failed
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Tokens file could not be written or read
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Table export failed
    #[error("Export failed: {0}")]
    Export(#[source] std::io::Error),
}

/// Errors raised by a word tokenizer backend
#[derive(Error, Debug)]
pub enum TokenizeError {
    /// Model data is not available locally
    #[error("Tokenizer data not found at {}", path.display())]
    DataMissing { path: PathBuf },

    /// Downloading model data failed
    #[error("Failed to download tokenizer data: {0}")]
    Download(#[from] reqwest::Error),

    /// Download server answered with a non-success status
    #[error("Tokenizer data download from {url} returned {status}")]
    DownloadStatus { url: String, status: u16 },

    /// Reading or writing model data failed
    #[error("Tokenizer data I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model data is not valid JSON
    #[error("Invalid tokenizer data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Errors raised while persisting or loading the tokens file
#[derive(Error, Debug)]
pub enum StorageError {
    /// Tokens file could not be opened
    #[error("Cannot open tokens file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tokens file could not be written out
    #[error("Cannot write tokens file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Failed to encode tokens: {0}")]
    Encode(#[source] bincode::Error),

    /// Deserialization failed
    #[error("Failed to decode tokens: {0}")]
    Decode(#[source] bincode::Error),
}
