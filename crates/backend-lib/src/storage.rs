// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with in-memory implementation.
//!
//! Every query returns a fully-populated record; nothing is lazily loaded
//! after the fact. Multi-write operations are single trait methods so the
//! backing store can make them one transaction.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{roles, RefreshToken, Role, User, UserRole};
use crate::error::AuthError;

/// A user together with their role names, fetched eagerly.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub roles: Vec<String>,
}

/// A refresh token together with its owning user and that user's role names.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: RefreshToken,
    pub user: User,
    pub roles: Vec<String>,
}

/// Trait for credential storage backends
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Look a user up by either unique key. Used for duplicate checks.
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Look a user up by email, with their role names.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Persist a new user. Fails on a duplicate email or username.
    async fn insert_user(&self, user: &User) -> Result<(), AuthError>;

    /// Look a role up by its unique name.
    async fn find_role(&self, name: &str) -> Result<Option<Role>, AuthError>;

    /// Persist a role. Fails on a duplicate name.
    async fn insert_role(&self, role: &Role) -> Result<(), AuthError>;

    /// Link a user to a role. Inserting an existing link is a no-op.
    async fn insert_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AuthError>;

    /// Persist a new refresh token.
    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError>;

    /// Look a refresh token up by its opaque value, with owner and roles.
    async fn find_refresh_token(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Atomically revoke the token `presented_id` and insert `replacement`
    /// as its successor, linking the two through `replaced_by_token`.
    ///
    /// The revocation is conditional on the token still being active at
    /// `now`. Returns `false` without writing anything when it is not:
    /// concurrent rotations of the same token admit exactly one winner here.
    async fn rotate_refresh_token(
        &self,
        presented_id: Uuid,
        now: DateTime<Utc>,
        revoked_by_ip: &str,
        replacement: &RefreshToken,
    ) -> Result<bool, AuthError>;

    /// Revoke every token of `user_id` still active at `now`. Returns how
    /// many were revoked; zero is a valid outcome, not an error.
    async fn revoke_active_tokens_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        revoked_by_ip: &str,
    ) -> Result<usize, AuthError>;

    /// Stamp a successful login on the user.
    async fn update_last_login(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<(), AuthError>;
}

/// Install the fixed role catalog when it is not present yet. Safe to call
/// on every startup.
pub async fn seed_default_roles(store: &impl AuthStore) -> Result<(), AuthError> {
    if store.find_role(roles::ADMIN).await?.is_none() {
        store
            .insert_role(&Role::create(
                roles::ADMIN,
                "Administrator role with full access",
            ))
            .await?;
    }
    if store.find_role(roles::USER).await?.is_none() {
        store
            .insert_role(&Role::create(
                roles::USER,
                "Regular user role with limited access",
            ))
            .await?;
    }
    Ok(())
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    users_by_username: HashMap<String, Uuid>,
    roles: HashMap<Uuid, Role>,
    roles_by_name: HashMap<String, Uuid>,
    user_roles: HashSet<UserRole>,
    tokens: HashMap<Uuid, RefreshToken>,
    tokens_by_value: HashMap<String, Uuid>,
}

impl Inner {
    fn role_names_for(&self, user_id: Uuid) -> Vec<String> {
        let mut names: Vec<String> = self
            .user_roles
            .iter()
            .filter(|link| link.user_id == user_id)
            .filter_map(|link| self.roles.get(&link.role_id))
            .map(|role| role.name().to_string())
            .collect();
        names.sort();
        names
    }

    fn user_record(&self, user_id: Uuid) -> Option<UserRecord> {
        let user = self.users.get(&user_id)?.clone();
        let roles = self.role_names_for(user_id);
        Some(UserRecord { user, roles })
    }
}

/// In-memory implementation of the [`AuthStore`] trait.
///
/// A single writer lock is the transaction boundary: every mutating call
/// reads, checks and writes under one guard, which is what gives
/// [`AuthStore::rotate_refresh_token`] its one-winner guarantee.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AuthError> {
        let inner = self.inner.read().await;
        let id = inner
            .users_by_email
            .get(email)
            .or_else(|| inner.users_by_username.get(username));
        Ok(id.and_then(|id| inner.users.get(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let inner = self.inner.read().await;
        let id = match inner.users_by_email.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(inner.user_record(id))
    }

    async fn insert_user(&self, user: &User) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;
        if inner.users_by_email.contains_key(user.email())
            || inner.users_by_username.contains_key(user.username())
        {
            return Err(AuthError::DuplicateUser);
        }
        inner
            .users_by_email
            .insert(user.email().to_string(), user.id());
        inner
            .users_by_username
            .insert(user.username().to_string(), user.id());
        inner.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let inner = self.inner.read().await;
        Ok(inner
            .roles_by_name
            .get(name)
            .and_then(|id| inner.roles.get(id))
            .cloned())
    }

    async fn insert_role(&self, role: &Role) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;
        if inner.roles_by_name.contains_key(role.name()) {
            return Err(AuthError::Internal(format!(
                "role {:?} already exists",
                role.name()
            )));
        }
        inner.roles_by_name.insert(role.name().to_string(), role.id());
        inner.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn insert_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user_id) {
            return Err(AuthError::Internal(format!("unknown user {user_id}")));
        }
        if !inner.roles.contains_key(&role_id) {
            return Err(AuthError::Internal(format!("unknown role {role_id}")));
        }
        inner.user_roles.insert(UserRole { user_id, role_id });
        Ok(())
    }

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;
        if inner.tokens_by_value.contains_key(token.token()) {
            return Err(AuthError::Internal(
                "refresh token value collision".to_string(),
            ));
        }
        inner
            .tokens_by_value
            .insert(token.token().to_string(), token.id());
        inner.tokens.insert(token.id(), token.clone());
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let inner = self.inner.read().await;
        let token = match inner
            .tokens_by_value
            .get(token_value)
            .and_then(|id| inner.tokens.get(id))
        {
            Some(token) => token.clone(),
            None => return Ok(None),
        };
        let user = inner
            .users
            .get(&token.user_id())
            .cloned()
            .ok_or_else(|| AuthError::Internal(format!("token owner {} missing", token.user_id())))?;
        let roles = inner.role_names_for(user.id());
        Ok(Some(RefreshTokenRecord { token, user, roles }))
    }

    async fn rotate_refresh_token(
        &self,
        presented_id: Uuid,
        now: DateTime<Utc>,
        revoked_by_ip: &str,
        replacement: &RefreshToken,
    ) -> Result<bool, AuthError> {
        let mut inner = self.inner.write().await;
        if inner.tokens_by_value.contains_key(replacement.token()) {
            return Err(AuthError::Internal(
                "refresh token value collision".to_string(),
            ));
        }

        let presented = match inner.tokens.get_mut(&presented_id) {
            Some(token) => token,
            None => return Ok(false),
        };
        if !presented.is_active(now) {
            return Ok(false);
        }
        presented.revoke(now, revoked_by_ip, Some(replacement.token().to_string()));

        inner
            .tokens_by_value
            .insert(replacement.token().to_string(), replacement.id());
        inner.tokens.insert(replacement.id(), replacement.clone());
        Ok(true)
    }

    async fn revoke_active_tokens_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        revoked_by_ip: &str,
    ) -> Result<usize, AuthError> {
        let mut inner = self.inner.write().await;
        let mut revoked = 0;
        for token in inner.tokens.values_mut() {
            if token.user_id() == user_id && token.is_active(now) {
                token.revoke(now, revoked_by_ip, None);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn update_last_login(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<(), AuthError> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AuthError::Internal(format!("unknown user {user_id}")))?;
        user.record_login(now);
        Ok(())
    }
}
