//! Backend call failures.

use thiserror::Error;

/// Why a backend call failed. Display strings are the user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached; the detail is only logged.
    #[error("Network error. Please check your connection.")]
    Network(String),

    #[error("Authentication required. Please sign in.")]
    AuthRequired,

    #[error("Server returned HTML instead of JSON")]
    UnexpectedHtml,

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid server response: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Sign-in prompts must never be conflated with generic failures.
    pub fn is_auth_required(&self) -> bool {
        matches!(
            self,
            ApiError::AuthRequired | ApiError::Server { status: 401, .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::AuthRequired => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::Client(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_detail_hidden_from_user() {
        let err = ApiError::Network("connection refused (os error 111)".into());
        assert_eq!(
            err.to_string(),
            "Network error. Please check your connection."
        );
        assert!(!err.is_auth_required());
    }

    #[test]
    fn test_auth_never_conflated() {
        assert!(ApiError::AuthRequired.is_auth_required());
        assert!(ApiError::Server {
            status: 401,
            message: "Unauthorized".into()
        }
        .is_auth_required());
        assert!(!ApiError::Server {
            status: 500,
            message: "boom".into()
        }
        .is_auth_required());
    }

    #[test]
    fn test_status() {
        let err = ApiError::Server {
            status: 404,
            message: "Model not found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Model not found");
        assert_eq!(ApiError::UnexpectedHtml.status(), None);
    }
}
