// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! shared between the fxauth service and the other platform services that
//! call it. This module defines the HTTP API request and response bodies.
//!
//! Everything here serializes as camelCase JSON, matching the wire format
//! the rest of the platform already speaks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// New-account registration request
/// # Fields
/// * `email` - Unique address the account is registered under
/// * `username` - Unique public handle
/// * `password` - Plaintext password; hashed before it is stored
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Password login request
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Exchange a refresh token for a new token pair
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Session issued to a caller: identity, role set, and the token pair
/// # Fields
/// * `access_token` - Short-lived signed JWT presented to the other services
/// * `refresh_token` - Long-lived opaque secret, single-use, rotated on
///   every exchange
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub roles: Vec<String>,
}

/// Logout acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: String,
}
