//! Error handling module for videolog

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for videolog operations
#[derive(Error, Debug)]
pub enum VideologError {
    /// Domain rule or port failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file could not be parsed
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for videolog operations
pub type VideologResult<T> = std::result::Result<T, VideologError>;
