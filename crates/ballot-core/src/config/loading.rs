//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.ballot/config.toml`
//! 3. **Project config** - `./.ballot/config.toml`
//! 4. **Environment** - `BALLOT_API_URL`
//! 5. **CLI arguments** - Command-line flags (applied by the caller)

use crate::config::types::{ApiConfig, BallotConfig, CountdownConfig, VotingConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "BALLOT_API_URL";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if
/// validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<BallotConfig, ConfigError> {
    let mut config = BallotConfig::default();

    if let Some(home_dir) = dirs::home_dir() {
        let user_path = home_dir.join(".ballot").join("config.toml");
        if let Some(user_config) = load_optional_config_file(&user_path)? {
            config = merge_configs(config, user_config);
        }
    }

    let project_path = std::env::current_dir()?
        .join(".ballot")
        .join("config.toml");
    if let Some(project_config) = load_optional_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    apply_env_overrides(&mut config);

    validate_config(&config)?;

    Ok(config)
}

/// Load a config file, treating a missing file as `None`.
fn load_optional_config_file(path: &Path) -> Result<Option<BallotConfig>, ConfigError> {
    match load_config_file(path) {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::ConfigNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<BallotConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

/// Apply environment variable overrides on top of file configuration.
pub fn apply_env_overrides(config: &mut BallotConfig) {
    if let Ok(url) = std::env::var(API_URL_ENV)
        && !url.is_empty()
    {
        config.api.base_url = Some(url);
    }
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are replaced only when the override sets them.
pub fn merge_configs(base: BallotConfig, override_config: BallotConfig) -> BallotConfig {
    BallotConfig {
        api: ApiConfig {
            base_url: override_config.api.base_url.or(base.api.base_url),
            timeout_ms: override_config.api.timeout_ms.or(base.api.timeout_ms),
        },
        countdown: CountdownConfig {
            tick_interval_ms: override_config
                .countdown
                .tick_interval_ms
                .or(base.countdown.tick_interval_ms),
        },
        voting: VotingConfig {
            fail_closed: override_config
                .voting
                .fail_closed
                .or(base.voting.fail_closed),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_file_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config_file(&temp_dir.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_config_hierarchy_merge() {
        let temp_dir = TempDir::new().unwrap();
        let user_path = temp_dir.path().join("user.toml");
        let project_path = temp_dir.path().join("project.toml");

        fs::write(
            &user_path,
            r#"
[api]
base_url = "https://vote.example.edu"
timeout_ms = 5000

[countdown]
tick_interval_ms = 500
"#,
        )
        .unwrap();
        fs::write(
            &project_path,
            r#"
[api]
timeout_ms = 20000

[voting]
fail_closed = true
"#,
        )
        .unwrap();

        let user_config = load_config_file(&user_path).unwrap();
        let project_config = load_config_file(&project_path).unwrap();
        let merged = merge_configs(user_config, project_config);

        assert_eq!(merged.api.base_url(), "https://vote.example.edu"); // From user
        assert_eq!(merged.api.timeout_ms, Some(20000)); // Overridden by project
        assert_eq!(merged.countdown.tick_interval_ms, Some(500)); // From user
        assert!(merged.voting.fail_closed()); // From project
    }

    #[test]
    fn test_project_can_turn_fail_closed_back_off() {
        let user_config: BallotConfig = toml::from_str("[voting]\nfail_closed = true\n").unwrap();
        let project_config: BallotConfig =
            toml::from_str("[voting]\nfail_closed = false\n").unwrap();

        let merged = merge_configs(user_config.clone(), project_config);
        assert_eq!(merged.voting.fail_closed, Some(false));
        assert!(!merged.voting.fail_closed());

        // Unset in the project file keeps the user's choice
        let merged = merge_configs(user_config, BallotConfig::default());
        assert!(merged.voting.fail_closed());
    }

    #[test]
    fn test_merge_with_empty_override_keeps_base() {
        let mut base = BallotConfig::default();
        base.api.base_url = Some("https://a.example".to_string());

        let merged = merge_configs(base.clone(), BallotConfig::default());
        assert_eq!(merged, base);
    }
}
