// Session configuration model

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::FrameRate;
use crate::shuttle::protocol::{
    ACTIVE_POLL_INTERVAL, IDLE_POLL_INTERVAL, SHUTTLE_PRODUCT_ID, SHUTTLE_VENDOR_ID,
};

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }
}

/// Shuttle controller identity and poll cadences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuttleSettings {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Always-on wheel poll, milliseconds
    pub idle_poll_ms: u64,
    /// Post-connect wheel poll, milliseconds
    pub active_poll_ms: u64,
}

impl Default for ShuttleSettings {
    fn default() -> Self {
        Self {
            vendor_id: SHUTTLE_VENDOR_ID,
            product_id: SHUTTLE_PRODUCT_ID,
            idle_poll_ms: IDLE_POLL_INTERVAL.as_millis() as u64,
            active_poll_ms: ACTIVE_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideologConfig {
    pub frame_rate: u32,
    pub log_level: String,
    pub log_json: bool,
    pub api_base_url: String,
    pub shuttle: ShuttleSettings,
}

impl Default for VideologConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default().fps(),
            log_level: "info".to_string(),
            log_json: false,
            api_base_url: "http://localhost:5000".to_string(),
            shuttle: ShuttleSettings::default(),
        }
    }
}

impl VideologConfig {
    /// Validated frame rate
    pub fn frame_rate(&self) -> Result<FrameRate, DomainError> {
        FrameRate::new(self.frame_rate)
    }

    /// Check every field for usable values
    pub fn validate(&self) -> Result<(), DomainError> {
        self.frame_rate()?;
        LogLevel::parse(&self.log_level)?;

        if self.api_base_url.trim().is_empty() {
            return Err(DomainError::ConfigFailed(
                "api_base_url cannot be empty".to_string(),
            ));
        }
        if self.shuttle.idle_poll_ms == 0 || self.shuttle.active_poll_ms == 0 {
            return Err(DomainError::ConfigFailed(
                "Shuttle poll periods must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
