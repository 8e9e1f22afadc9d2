use super::types::{FailureBody, RestrictedRole};
use crate::errors::BallotError;

/// Failure talking to the election service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Session rejected by election service (HTTP {status})")]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    #[error("Accounts with the {role} role may not vote")]
    RoleForbidden {
        role: RestrictedRole,
        message: Option<String>,
    },

    #[error("Election service returned HTTP {status}{}", message_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Unexpected response from election service: {message}")]
    InvalidResponse { message: String },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// Classify a non-success response from its status code and raw body.
    ///
    /// 403 bodies flagged `isAdmin`/`isLecturer` become
    /// [`ApiError::RoleForbidden`]; other 401/403 responses become
    /// [`ApiError::Unauthorized`].
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: FailureBody = serde_json::from_str(body).unwrap_or_default();

        match status {
            403 if parsed.is_admin => ApiError::RoleForbidden {
                role: RestrictedRole::Admin,
                message: parsed.message,
            },
            403 if parsed.is_lecturer => ApiError::RoleForbidden {
                role: RestrictedRole::Lecturer,
                message: parsed.message,
            },
            401 | 403 => ApiError::Unauthorized {
                status,
                message: parsed.message,
            },
            _ => ApiError::Status {
                status,
                message: parsed.message,
            },
        }
    }

    /// 401/403 of any kind. Primary data fetches treat these as an expired session.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::RoleForbidden { .. }
        )
    }

    /// Message supplied by the service in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. }
            | ApiError::RoleForbidden { message, .. }
            | ApiError::Status { message, .. } => message.as_deref(),
            ApiError::RequestFailed { .. } | ApiError::InvalidResponse { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return ApiError::InvalidResponse {
                message: error.to_string(),
            };
        }
        let message = if error.is_timeout() {
            "timed out waiting for election service".to_string()
        } else {
            error.to_string()
        };
        ApiError::RequestFailed { message }
    }
}

impl BallotError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "API_UNAUTHORIZED",
            ApiError::RoleForbidden { .. } => "API_ROLE_FORBIDDEN",
            ApiError::Status { .. } => "API_STATUS",
            ApiError::RequestFailed { .. } => "API_REQUEST_FAILED",
            ApiError::InvalidResponse { .. } => "API_INVALID_RESPONSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::RoleForbidden { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_flag_on_403_is_role_forbidden() {
        let error = ApiError::from_response(403, r#"{"isAdmin": true, "message": "no"}"#);
        assert_eq!(
            error,
            ApiError::RoleForbidden {
                role: RestrictedRole::Admin,
                message: Some("no".to_string()),
            }
        );
        assert!(error.is_auth_failure());
        assert_eq!(error.error_code(), "API_ROLE_FORBIDDEN");
    }

    #[test]
    fn test_lecturer_flag_on_403_is_role_forbidden() {
        let error = ApiError::from_response(403, r#"{"isLecturer": true}"#);
        assert!(matches!(
            error,
            ApiError::RoleForbidden {
                role: RestrictedRole::Lecturer,
                ..
            }
        ));
    }

    #[test]
    fn test_role_flags_ignored_outside_403() {
        let error = ApiError::from_response(401, r#"{"isAdmin": true}"#);
        assert!(matches!(error, ApiError::Unauthorized { status: 401, .. }));
    }

    #[test]
    fn test_plain_403_is_unauthorized() {
        let error = ApiError::from_response(403, "Forbidden");
        assert!(matches!(
            error,
            ApiError::Unauthorized {
                status: 403,
                message: None
            }
        ));
    }

    #[test]
    fn test_other_status_keeps_server_message() {
        let error = ApiError::from_response(404, r#"{"message": "Election not found"}"#);
        assert_eq!(error.server_message(), Some("Election not found"));
        assert!(!error.is_auth_failure());

        let error = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(error.server_message(), None);
        assert_eq!(error.to_string(), "Election service returned HTTP 500");
    }
}
