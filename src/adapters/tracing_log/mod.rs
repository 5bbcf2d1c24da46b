// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::domain::errors::*;
use crate::domain::model::LogLevel;

/// Installs the process-wide tracing subscriber
pub struct TracingLogAdapter {
    level: LogLevel,
    json_output: bool,
}

impl TracingLogAdapter {
    pub fn new(level: LogLevel, json_output: bool) -> Self {
        Self { level, json_output }
    }

    /// Initialize the subscriber; `RUST_LOG` overrides the configured level.
    ///
    /// Logs go to stderr so command output on stdout stays clean. A second
    /// call is a no-op.
    pub fn init(&self) -> Result<(), DomainError> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| self.default_filter());

        let result = if self.json_output {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        };

        if let Err(e) = result {
            tracing::debug!("Tracing subscriber already installed: {}", e);
        }
        Ok(())
    }

    /// Filter used when `RUST_LOG` is unset
    fn default_filter(&self) -> EnvFilter {
        let level = LevelFilter::from_level(Self::to_tracing_level(&self.level));
        EnvFilter::default().add_directive(level.into())
    }

    fn to_tracing_level(level: &LogLevel) -> tracing::Level {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
