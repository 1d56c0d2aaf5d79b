use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Remote base URL is http(s) and the timeout is not 0
/// - Cache staleness window and cascade concurrency are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let base_url = &config.remote.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "remote.base_url must be an http(s) URL, got '{}'",
            base_url
        )));
    }

    if config.remote.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "remote.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.cache.stale_after_hours == 0 {
        return Err(ConfigError::ValidationError(
            "cache.stale_after_hours cannot be 0".to_string(),
        ));
    }

    if config.cache.cascade_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "cache.cascade_concurrency cannot be 0".to_string(),
        ));
    }

    Ok(())
}
