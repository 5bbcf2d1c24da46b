// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::errors::*;
use crate::domain::model::VideologConfig;
use crate::error::VideologResult;
use crate::ports::*;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "videolog.toml";

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: RwLock<VideologConfig>,
    config_file_path: RwLock<Option<PathBuf>>,
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Self {
        Self {
            config: RwLock::new(VideologConfig::default()),
            config_file_path: RwLock::new(None),
        }
    }

    /// Read and parse a config file
    pub fn read_file(path: &Path) -> VideologResult<VideologConfig> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Serialize and write a config file, creating parent directories
    pub fn write_file(path: &Path, config: &VideologConfig) -> VideologResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply(config: &mut VideologConfig, key: &str, value: &str) -> Result<(), DomainError> {
        let bad = |e: &dyn std::fmt::Display| {
            DomainError::ConfigFailed(format!("Invalid value for {}: {}", key, e))
        };

        match key {
            "frame_rate" => config.frame_rate = value.parse().map_err(|e| bad(&e))?,
            "log_level" => config.log_level = value.to_string(),
            "log_json" => config.log_json = value.parse().map_err(|e| bad(&e))?,
            "api_base_url" => config.api_base_url = value.to_string(),
            "shuttle.vendor_id" => config.shuttle.vendor_id = parse_id(value).map_err(|e| bad(&e))?,
            "shuttle.product_id" => {
                config.shuttle.product_id = parse_id(value).map_err(|e| bad(&e))?
            }
            "shuttle.idle_poll_ms" => {
                config.shuttle.idle_poll_ms = value.parse().map_err(|e| bad(&e))?
            }
            "shuttle.active_poll_ms" => {
                config.shuttle.active_poll_ms = value.parse().map_err(|e| bad(&e))?
            }
            _ => {
                return Err(DomainError::ConfigFailed(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

/// USB ids are usually written in hex
fn parse_id(value: &str) -> Result<u16, std::num::ParseIntError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn current(&self) -> VideologConfig {
        self.config.read().clone()
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut config = self.config.write();
        Self::apply(&mut config, key, value)?;
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &str) -> Result<(), DomainError> {
        let path = PathBuf::from(file_path);

        if !path.exists() {
            return Err(DomainError::ConfigFailed(format!(
                "Config file does not exist: {}",
                file_path
            )));
        }

        let loaded = Self::read_file(&path)
            .map_err(|e| DomainError::ConfigFailed(format!("{}: {}", file_path, e)))?;

        *self.config.write() = loaded;
        *self.config_file_path.write() = Some(path);
        Ok(())
    }

    async fn save_config(&self, file_path: &str) -> Result<(), DomainError> {
        let path = PathBuf::from(file_path);
        let config = self.config.read().clone();

        Self::write_file(&path, &config)
            .map_err(|e| DomainError::ConfigFailed(format!("{}: {}", file_path, e)))?;

        *self.config_file_path.write() = Some(path);
        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        self.config.read().validate()
    }

    async fn get_config_file_path(&self) -> Result<String, DomainError> {
        let config_path = self.config_file_path.read();
        Ok(config_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE))
            .to_string_lossy()
            .to_string())
    }
}
