//! Error types for quotebook-core

use thiserror::Error;

/// Result type alias using quotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotebook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A quote field was missing or blank
    #[error("Invalid quote: {0}")]
    Validation(String),

    /// No quote matched the requested filter
    #[error("No quotes available for {0}")]
    EmptyResult(String),

    /// An import document could not be understood
    #[error("Could not parse quotes document: {0}")]
    Parse(String),

    /// Fetching from or posting to the remote collection failed
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
