//! # Configuration System
//!
//! Hierarchical TOML configuration for ballot.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.ballot/config.toml` (global user preferences)
//! 3. **Project config** - `./.ballot/config.toml` (directory-specific overrides)
//! 4. **Environment** - `BALLOT_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use ballot_core::config::BallotConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BallotConfig::load_hierarchy()?;
//!     println!("talking to {}", config.api.base_url());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{ApiConfig, BallotConfig, Config, CountdownConfig, VotingConfig};
pub use validation::validate_config;

impl BallotConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
