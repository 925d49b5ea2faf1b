// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::AuthError;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Access-token signing settings
    pub jwt: JwtSettings,
    /// Refresh-token lifetime settings
    #[serde(default)]
    pub refresh: RefreshSettings,
}

/// Access-token signing settings
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// HMAC signing secret. Required; there is no usable default.
    pub secret_key: String,
    #[serde(default = "default_token_party")]
    pub issuer: String,
    #[serde(default = "default_token_party")]
    pub audience: String,
    /// Access-token lifetime in minutes
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
}

/// Refresh-token lifetime settings
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSettings {
    /// Refresh-token lifetime in days
    #[serde(default = "default_refresh_ttl_days")]
    pub ttl_days: i64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            ttl_days: default_refresh_ttl_days(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "127.0.0.1:3000".parse().unwrap()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_party() -> String {
    "fxauth".to_string()
}

fn default_access_token_minutes() -> i64 {
    15
}

fn default_refresh_ttl_days() -> i64 {
    7
}

impl Settings {
    /// Load settings from `config.toml` with `FXAUTH_` environment
    /// overrides (nested keys split on `__`, e.g. `FXAUTH_JWT__SECRET_KEY`).
    pub fn load() -> Result<Self, AuthError> {
        Self::load_from("config.toml")
    }

    /// Load settings from an explicit file path plus environment overrides.
    pub fn load_from(path: &str) -> Result<Self, AuthError> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("FXAUTH_").split("__"))
            .extract()
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Fail fast on settings the service cannot run without.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt.secret_key.trim().is_empty() {
            return Err(AuthError::Configuration(
                "jwt.secret_key is not configured".to_string(),
            ));
        }
        if self.jwt.access_token_minutes <= 0 {
            return Err(AuthError::Configuration(
                "jwt.access_token_minutes must be positive".to_string(),
            ));
        }
        if self.refresh.ttl_days <= 0 {
            return Err(AuthError::Configuration(
                "refresh.ttl_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, AuthError> {
        let settings: Settings = Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let settings = from_toml(
            r#"
            [jwt]
            secret_key = "dev-secret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.jwt.issuer, "fxauth");
        assert_eq!(settings.jwt.audience, "fxauth");
        assert_eq!(settings.jwt.access_token_minutes, 15);
        assert_eq!(settings.refresh.ttl_days, 7);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings = from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            log_level = "debug"

            [jwt]
            secret_key = "dev-secret"
            issuer = "platform"
            audience = "platform-services"
            access_token_minutes = 5

            [refresh]
            ttl_days = 30
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(settings.jwt.issuer, "platform");
        assert_eq!(settings.jwt.audience, "platform-services");
        assert_eq!(settings.jwt.access_token_minutes, 5);
        assert_eq!(settings.refresh.ttl_days, 30);
    }

    #[test]
    fn missing_secret_fails_fast() {
        let result = from_toml(
            r#"
            [jwt]
            secret_key = ""
            "#,
        );
        assert!(matches!(result, Err(AuthError::Configuration(_))));

        // absent entirely is just as fatal
        let result = from_toml("log_level = \"info\"");
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn nonsense_lifetimes_are_rejected() {
        let result = from_toml(
            r#"
            [jwt]
            secret_key = "dev-secret"
            access_token_minutes = 0
            "#,
        );
        assert!(matches!(result, Err(AuthError::Configuration(_))));

        let result = from_toml(
            r#"
            [jwt]
            secret_key = "dev-secret"

            [refresh]
            ttl_days = -1
            "#,
        );
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }
}
