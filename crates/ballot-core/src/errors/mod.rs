use std::error::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Base trait for all application errors
pub trait BallotError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type BallotResult<T> = Result<T, Box<dyn BallotError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid API base URL '{url}'. It must start with http:// or https://")]
    InvalidBaseUrl { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl BallotError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidBaseUrl { .. } => "INVALID_BASE_URL",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. }
                | ConfigError::InvalidBaseUrl { .. }
                | ConfigError::InvalidConfiguration { .. }
        )
    }
}

/// Failure of a step in the election screen's voting flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Not logged in: no session token is stored")]
    AuthMissing,

    #[error("Session expired, log in again ({source})")]
    AuthExpired { source: ApiError },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Candidate '{candidate_id}' is not listed for this election")]
    UnknownCandidate { candidate_id: String },

    #[error("Candidates have not been loaded yet")]
    NotLoaded,

    #[error("No countdown is running for this election")]
    NoCountdown,
}

impl FlowError {
    /// Whether the viewer has to log in again to continue.
    pub fn requires_login(&self) -> bool {
        matches!(self, FlowError::AuthMissing | FlowError::AuthExpired { .. })
    }
}

impl BallotError for FlowError {
    fn error_code(&self) -> &'static str {
        match self {
            FlowError::AuthMissing => "AUTH_MISSING",
            FlowError::AuthExpired { .. } => "AUTH_EXPIRED",
            FlowError::Api(e) => e.error_code(),
            FlowError::Storage(e) => e.error_code(),
            FlowError::UnknownCandidate { .. } => "UNKNOWN_CANDIDATE",
            FlowError::NotLoaded => "NOT_LOADED",
            FlowError::NoCountdown => "NO_COUNTDOWN",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            FlowError::AuthMissing
            | FlowError::AuthExpired { .. }
            | FlowError::UnknownCandidate { .. }
            | FlowError::NoCountdown => true,
            FlowError::NotLoaded => false,
            FlowError::Api(e) => e.is_user_error(),
            FlowError::Storage(e) => e.is_user_error(),
        }
    }
}
