// ============================
// crates/backend-lib/src/auth/jwt.rs
// ============================
//! Access-token signing and verification, plus refresh-secret generation.
//!
//! Access tokens are HS256 JWTs carrying the caller's identity and role set;
//! downstream services verify them without calling back here. Refresh
//! secrets are plain random bytes with no embedded claims; they only mean
//! something to the token store.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::token_generator::SecureRandom;
use crate::clock::Clock;
use crate::config::JwtSettings;
use crate::domain::User;
use crate::error::AuthError;

/// Number of random bytes behind each opaque refresh secret.
const REFRESH_SECRET_BYTES: usize = 64;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Fresh per-token id
    pub jti: String,
    pub username: String,
    /// Duplicate of `sub`, consumed by downstream request-log correlation
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// One entry per assigned role
    #[serde(rename = "role")]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access tokens with a symmetric key.
#[derive(Clone)]
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    clock: Arc<dyn Clock>,
    random: Arc<dyn SecureRandom>,
}

impl JwtSigner {
    /// Build a signer from settings. An empty secret is a deployment fault
    /// and fails construction.
    pub fn from_settings(
        settings: &JwtSettings,
        clock: Arc<dyn Clock>,
        random: Arc<dyn SecureRandom>,
    ) -> Result<Self, AuthError> {
        if settings.secret_key.trim().is_empty() {
            return Err(AuthError::Configuration(
                "JWT secret key not configured".to_string(),
            ));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(settings.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret_key.as_bytes()),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_ttl: Duration::minutes(settings.access_token_minutes),
            clock,
            random,
        })
    }

    /// Issue a signed access token for `user` with the given role names.
    pub fn issue(&self, user: &User, roles: &[String]) -> Result<String, AuthError> {
        let now = self.clock.now_utc();
        let claims = AccessClaims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            jti: Uuid::new_v4().to_string(),
            username: user.username().to_string(),
            client_id: user.id().to_string(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("failed to sign access token: {e}")))
    }

    /// Verify signature, issuer, audience and expiry. Zero clock-skew
    /// leeway: an expired token is rejected with no grace period.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Generate the opaque secret for a refresh token: 64 random bytes,
    /// base64-encoded.
    pub fn generate_refresh_secret(&self) -> String {
        let mut buf = [0u8; REFRESH_SECRET_BYTES];
        self.random.fill_bytes(&mut buf);
        STANDARD.encode(buf)
    }
}
