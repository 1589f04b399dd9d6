//! Error types for the password audit tool

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading the hash file or the wordlist.
///
/// All of these are fatal: a run never starts from a partially loaded
/// target set or wordlist.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("cannot open {path}: {source}")]
    MissingFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: digest is not valid hex: {content:?}")]
    MalformedLine {
        path: String,
        line: usize,
        content: String,
    },

    #[error("no hash records loaded from {path}")]
    NoRecords { path: String },

    #[error("no words loaded from {path}")]
    NoWords { path: String },
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid batch size: {0}. Must be greater than 0")]
    InvalidBatchSize(usize),

    #[error("Invalid top-words bound: {0}. Must be greater than 0")]
    InvalidTopWords(usize),

    #[error("Invalid padded number length: {0}. Must be between 1 and 10")]
    InvalidPaddedLength(usize),

    #[error("Invalid progress update interval: {0} ms. Must be greater than 0")]
    InvalidProgressInterval(u64),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AuditError>;
