use crate::config::types::{Config, FilesConfig, ScraperConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_files_config(&config.files)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.worker_count < 1 || config.worker_count > 100 {
        return Err(ConfigError::Validation(format!(
            "worker_count must be between 1 and 100, got {}",
            config.worker_count
        )));
    }

    if config.rate_limit_per_sec < 1 || config.rate_limit_per_sec > 1000 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_per_sec must be between 1 and 1000, got {}",
            config.rate_limit_per_sec
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates file path configuration
fn validate_files_config(config: &FilesConfig) -> Result<(), ConfigError> {
    if config.input_path.is_empty() {
        return Err(ConfigError::Validation(
            "input_path cannot be empty".to_string(),
        ));
    }

    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config
        .listen_addr
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Validation(format!(
                "listen_addr '{}' is not a valid socket address: {}",
                config.listen_addr, e
            ))
        })?;

    Ok(())
}
