// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User with this email or username already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredToken,

    /// Access-token verification failure. The payload records the underlying
    /// validation reason for logs; it never reaches a response body.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidOrExpiredToken
            | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::DuplicateUser => "AUTH_001",
            AuthError::InvalidCredentials => "AUTH_002",
            AuthError::InvalidOrExpiredToken => "AUTH_003",
            AuthError::InvalidToken(_) => "AUTH_004",
            AuthError::Configuration(_) => "CFG_001",
            AuthError::InvalidInput(_) => "VAL_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AuthError::DuplicateUser => {
                "User with this email or username already exists".to_string()
            },
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::InvalidOrExpiredToken => "Invalid or expired refresh token".to_string(),
            AuthError::InvalidToken(_) => "Invalid token".to_string(),
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            AuthError::InvalidInput(_) => "Invalid input provided".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production.
        // Token-verification detail stays sanitized in every build.
        let message = if cfg!(debug_assertions) && !matches!(self, AuthError::InvalidToken(_)) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        // Create a JSON response with error details
        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
