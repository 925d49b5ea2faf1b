// ============================
// crates/backend-lib/src/domain.rs
// ============================
//! Account domain entities.
//!
//! Entities are built through validating factories and changed only through
//! the mutation methods below; fields stay private so no caller can write
//! state transitions the entity does not offer. Derived refresh-token state
//! takes `now` as an argument, which keeps the clock injectable one layer up.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AuthError;

/// Names of the fixed role catalog seeded at startup.
pub mod roles {
    pub const ADMIN: &str = "Admin";
    pub const USER: &str = "User";
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a new active user. Empty email, username or password hash is
    /// rejected before anything reaches storage.
    pub fn create(
        email: &str,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::InvalidInput("email cannot be empty".to_string()));
        }
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username cannot be empty".to_string()));
        }
        if password_hash.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "password hash cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_active: true,
            created_at: now,
            last_login_at: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Stamp a successful login.
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }
}

/// A role from the fixed catalog. Immutable once created.
#[derive(Debug, Clone)]
pub struct Role {
    id: Uuid,
    name: String,
    description: String,
}

impl Role {
    pub fn create(name: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Join record linking a user to a role. Composite key (`user_id`, `role_id`),
/// no lifecycle beyond existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// A long-lived opaque credential, rotated on every use.
///
/// Revocation is terminal: a token moves from active to revoked exactly once
/// and never back. Tokens are not deleted; `replaced_by_token` chains each
/// token to its successor, which is what makes replayed rotations visible.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    id: Uuid,
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    created_by_ip: String,
    revoked_at: Option<DateTime<Utc>>,
    revoked_by_ip: Option<String>,
    replaced_by_token: Option<String>,
}

impl RefreshToken {
    pub fn create(
        user_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
        created_by_ip: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at,
            created_at: now,
            created_by_ip: created_by_ip.to_string(),
            revoked_at: None,
            revoked_by_ip: None,
            replaced_by_token: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by_ip(&self) -> &str {
        &self.created_by_ip
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    pub fn revoked_by_ip(&self) -> Option<&str> {
        self.revoked_by_ip.as_deref()
    }

    pub fn replaced_by_token(&self) -> Option<&str> {
        self.replaced_by_token.as_deref()
    }

    /// A token expires the instant `now` reaches `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// Terminal transition. A second call leaves the first revocation
    /// untouched.
    pub fn revoke(
        &mut self,
        now: DateTime<Utc>,
        revoked_by_ip: &str,
        replaced_by_token: Option<String>,
    ) {
        if self.revoked_at.is_some() {
            return;
        }
        self.revoked_at = Some(now);
        self.revoked_by_ip = Some(revoked_by_ip.to_string());
        self.replaced_by_token = replaced_by_token;
    }
}
