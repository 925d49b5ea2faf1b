// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Request validation for the HTTP boundary.
//!
//! The domain factories re-check emptiness on their own; this layer keeps
//! oversized or malformed input from reaching the service at all.

use std::sync::LazyLock;

use fxauth_common::{LoginRequest, RegisterRequest};
use regex::Regex;
use thiserror::Error;

use crate::error::AuthError;

// Common validation constants
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_USERNAME_LENGTH: usize = 100;
const MAX_NAME_LENGTH: usize = 100;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid refresh token: {0}")]
    InvalidRefreshToken(String),
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_register(request: &RegisterRequest) -> ValidationResult {
    validate_email(&request.email)?;
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_name(&request.first_name)?;
    validate_name(&request.last_name)?;
    Ok(())
}

pub fn validate_login(request: &LoginRequest) -> ValidationResult {
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    Ok(())
}

pub fn validate_refresh_token(token: &str) -> ValidationResult {
    if token.trim().is_empty() {
        return Err(ValidationError::InvalidRefreshToken(
            "token cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> ValidationResult {
    if email.trim().is_empty() {
        return Err(ValidationError::InvalidEmail(
            "email cannot be empty".to_string(),
        ));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "email format is invalid".to_string(),
        ));
    }
    Ok(())
}

fn validate_username(username: &str) -> ValidationResult {
    if username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "username cannot be empty".to_string(),
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "password cannot be empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> ValidationResult {
    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
