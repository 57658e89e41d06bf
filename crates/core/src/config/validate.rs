use super::{types::Config, ConfigError};

/// Longest accepted session lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: u32 = 24 * 365;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Login credentials are not empty
/// - Token lifetime is between one hour and one year
/// - Upstream base URL parses and the timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.username.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.username cannot be empty".to_string(),
        ));
    }
    if config.auth.password.is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.password cannot be empty".to_string(),
        ));
    }
    if config.auth.token_ttl_hours == 0 {
        return Err(ConfigError::ValidationError(
            "auth.token_ttl_hours cannot be 0".to_string(),
        ));
    }
    if config.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
        return Err(ConfigError::ValidationError(format!(
            "auth.token_ttl_hours cannot exceed {}",
            MAX_TOKEN_TTL_HOURS
        )));
    }

    if let Err(e) = reqwest::Url::parse(&config.upstream.base_url) {
        return Err(ConfigError::ValidationError(format!(
            "upstream.base_url is not a valid URL: {}",
            e
        )));
    }
    if config.upstream.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
