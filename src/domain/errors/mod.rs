// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Operator timestamp text did not match the entry pattern
    InvalidTimestamp(String),
    /// Frame rate was zero or otherwise unusable
    InvalidFrameRate(u32),
    /// Playback engine rejected a transport request
    PlaybackFailed(String),
    /// HID device could not be listed, opened or written
    DeviceFailed(String),
    /// Job form failed validation
    ValidationFailed(String),
    /// Backend job API rejected or could not be reached
    JobSubmissionFailed(String),
    /// Configuration could not be read, written or validated
    ConfigFailed(String),
    /// Functionality compiled out of this build
    Unsupported(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidTimestamp(text) => {
                write!(f, "Invalid timestamp '{}': expected [+|-] and 1-8 digits", text)
            }
            DomainError::InvalidFrameRate(rate) => {
                write!(f, "Invalid frame rate: {} (must be a positive integer)", rate)
            }
            DomainError::PlaybackFailed(msg) => write!(f, "Playback engine error: {}", msg),
            DomainError::DeviceFailed(msg) => write!(f, "HID device error: {}", msg),
            DomainError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            DomainError::JobSubmissionFailed(msg) => write!(f, "Job submission failed: {}", msg),
            DomainError::ConfigFailed(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
