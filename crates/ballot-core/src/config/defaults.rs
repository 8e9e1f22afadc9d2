//! Default values for configuration types.

use crate::config::types::Config;

/// Base URL used when no config file or override names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Request timeout for every call to the election service.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Countdown tick interval.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

impl Default for Config {
    fn default() -> Self {
        let ballot_dir = match dirs::home_dir() {
            Some(home) => home.join(".ballot"),
            None => {
                eprintln!(
                    "Warning: Could not find home directory. Set HOME environment variable. \
                    Using fallback directory."
                );
                std::env::temp_dir().join(".ballot")
            }
        };

        Self { ballot_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_dir_is_named_ballot() {
        let config = Config::default();
        assert!(config.ballot_dir.ends_with(".ballot"));
    }
}
