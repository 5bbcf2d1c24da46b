//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::VideologConfig;
use crate::ports::ConfigPort;

/// Files tried, in order, when no config file is given explicitly
pub const CONFIG_SEARCH_PATHS: &[&str] = &["videolog.toml", "config/videolog.toml"];

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("VIDEOLOG_FRAME_RATE", "frame_rate"),
    ("VIDEOLOG_LOG_LEVEL", "log_level"),
    ("VIDEOLOG_LOG_JSON", "log_json"),
    ("VIDEOLOG_API_BASE_URL", "api_base_url"),
    ("VIDEOLOG_SHUTTLE_VENDOR_ID", "shuttle.vendor_id"),
    ("VIDEOLOG_SHUTTLE_PRODUCT_ID", "shuttle.product_id"),
    ("VIDEOLOG_SHUTTLE_IDLE_POLL_MS", "shuttle.idle_poll_ms"),
    ("VIDEOLOG_SHUTTLE_ACTIVE_POLL_MS", "shuttle.active_poll_ms"),
];

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &dyn ConfigPort,
    config_file: Option<&str>,
    cli_overrides: &[(&str, String)],
) -> Result<VideologConfig, DomainError> {
    // Step 1: defaults are already held by the adapter
    // Step 2: file
    match config_file {
        Some(path) => {
            config.load_config(path).await?;
            info!("Loaded configuration from: {}", path);
        }
        None => {
            if let Some(path) = CONFIG_SEARCH_PATHS.iter().find(|p| Path::new(p).exists()) {
                config.load_config(path).await?;
                info!("Loaded configuration from: {}", path);
            } else {
                debug!("No configuration file found, using defaults");
            }
        }
    }

    // Step 3: environment
    let env_overrides = load_environment_variables(config, |name| std::env::var(name).ok()).await?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: command line
    for (key, value) in cli_overrides {
        debug!("CLI override: {} = {}", key, value);
        config.set_config(key, value).await?;
    }

    config.validate_config().await?;
    Ok(config.current().await)
}

/// Apply every mapped environment variable that `lookup` finds
pub async fn load_environment_variables<F>(
    config: &dyn ConfigPort,
    lookup: F,
) -> Result<usize, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    for (env_var, config_key) in ENV_MAPPINGS {
        if let Some(value) = lookup(env_var) {
            debug!("Found environment override: {} = {}", env_var, value);
            config.set_config(config_key, &value).await?;
            applied += 1;
        }
    }
    Ok(applied)
}
