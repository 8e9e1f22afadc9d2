//! Configuration type definitions for ballot.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://vote.example.edu"
//! timeout_ms = 15000
//!
//! [countdown]
//! tick_interval_ms = 1000
//!
//! [voting]
//! fail_closed = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime paths derived from the environment, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all ballot data (default: ~/.ballot)
    pub ballot_dir: PathBuf,
}

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.ballot/config.toml`
/// 2. Project config: `./.ballot/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BallotConfig {
    /// Remote election service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Countdown timer settings
    #[serde(default)]
    pub countdown: CountdownConfig,

    /// Vote flow policy
    #[serde(default)]
    pub voting: VotingConfig,
}

/// Remote election service settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the election service, e.g. `https://vote.example.edu`.
    /// Default: `http://localhost:5000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    /// Default: 15000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(super::defaults::DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeout_ms
                .unwrap_or(super::defaults::DEFAULT_TIMEOUT_MS),
        )
    }
}

/// Countdown timer settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CountdownConfig {
    /// Interval between countdown ticks in milliseconds.
    /// Default: 1000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
}

impl CountdownConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(
            self.tick_interval_ms
                .unwrap_or(super::defaults::DEFAULT_TICK_INTERVAL_MS),
        )
    }
}

/// Vote flow policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VotingConfig {
    /// Block the vote flow when the vote-status check fails for a reason
    /// other than a role restriction. Default: false (the flow continues).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_closed: Option<bool>,
}

impl VotingConfig {
    pub fn fail_closed(&self) -> bool {
        self.fail_closed.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: BallotConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url(), "http://localhost:5000");
        assert_eq!(config.api.timeout(), Duration::from_millis(15000));
        assert_eq!(config.countdown.tick_interval(), Duration::from_secs(1));
        assert!(!config.voting.fail_closed());
    }

    #[test]
    fn test_partial_config() {
        let config: BallotConfig = toml::from_str(
            r#"
[api]
base_url = "https://vote.example.edu"

[voting]
fail_closed = true
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url(), "https://vote.example.edu");
        assert_eq!(config.api.timeout_ms, None);
        assert!(config.voting.fail_closed());
    }
}
