//! Configuration validation logic.

use crate::config::types::BallotConfig;
use crate::errors::ConfigError;

/// Validate a BallotConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - API base URL must use the http or https scheme
/// - Timeout and tick interval, when set, must be greater than zero
pub fn validate_config(config: &BallotConfig) -> Result<(), ConfigError> {
    let url = config.api.base_url();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl {
            url: url.to_string(),
        });
    }

    if config.api.timeout_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "api.timeout_ms must be greater than zero".to_string(),
        });
    }

    if config.countdown.tick_interval_ms == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "countdown.tick_interval_ms must be greater than zero".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BallotConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = BallotConfig::default();
        config.api.base_url = Some("localhost:5000".to_string());

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = BallotConfig::default();
        config.api.timeout_ms = Some(0);

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_tick_interval() {
        let mut config = BallotConfig::default();
        config.countdown.tick_interval_ms = Some(0);

        assert!(validate_config(&config).is_err());
    }
}
