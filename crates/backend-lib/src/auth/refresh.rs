// ============================
// crates/backend-lib/src/auth/refresh.rs
// ============================
//! Refresh-token lifecycle: issuance, rotation, revocation.
use std::sync::Arc;

use chrono::Duration;
use metrics::counter;
use uuid::Uuid;

use crate::auth::jwt::JwtSigner;
use crate::clock::Clock;
use crate::domain::RefreshToken;
use crate::error::AuthError;
use crate::metrics::{REFRESH_ISSUED, REFRESH_REJECTED, REFRESH_ROTATED, TOKENS_REVOKED};
use crate::storage::{AuthStore, RefreshTokenRecord};

/// Manages the stored side of refresh credentials for one deployment.
pub struct RefreshTokenManager<S> {
    store: S,
    signer: JwtSigner,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S: AuthStore> RefreshTokenManager<S> {
    pub fn new(store: S, signer: JwtSigner, clock: Arc<dyn Clock>, ttl_days: i64) -> Self {
        Self {
            store,
            signer,
            clock,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue and persist a fresh token for `user_id`.
    pub async fn issue(&self, user_id: Uuid, client_ip: &str) -> Result<RefreshToken, AuthError> {
        let now = self.clock.now_utc();
        let token = RefreshToken::create(
            user_id,
            self.signer.generate_refresh_secret(),
            now + self.ttl,
            client_ip,
            now,
        );
        self.store.insert_refresh_token(&token).await?;
        counter!(REFRESH_ISSUED).increment(1);
        Ok(token)
    }

    /// Exchange `presented` for a successor token.
    ///
    /// The presented token must still be active: not found, expired, revoked
    /// and already-used all fail the same way, and the failure on an
    /// already-used token is what stops replay of a captured secret.
    /// Revoking the old token, linking it to its successor and inserting the
    /// successor happen as one storage unit, so two concurrent rotations of
    /// the same token resolve to one winner and one
    /// [`AuthError::InvalidOrExpiredToken`].
    pub async fn rotate(
        &self,
        presented: &str,
        client_ip: &str,
    ) -> Result<(RefreshTokenRecord, RefreshToken), AuthError> {
        let now = self.clock.now_utc();

        let record = match self.store.find_refresh_token(presented).await? {
            Some(record) => record,
            None => {
                counter!(REFRESH_REJECTED).increment(1);
                return Err(AuthError::InvalidOrExpiredToken);
            },
        };
        if !record.token.is_active(now) {
            counter!(REFRESH_REJECTED).increment(1);
            if record.token.is_revoked() {
                tracing::warn!(
                    user_id = %record.user.id(),
                    token_id = %record.token.id(),
                    "rejected reuse of a revoked refresh token"
                );
            }
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let replacement = RefreshToken::create(
            record.user.id(),
            self.signer.generate_refresh_secret(),
            now + self.ttl,
            client_ip,
            now,
        );
        let rotated = self
            .store
            .rotate_refresh_token(record.token.id(), now, client_ip, &replacement)
            .await?;
        if !rotated {
            // lost the race against a concurrent rotation or revocation
            counter!(REFRESH_REJECTED).increment(1);
            return Err(AuthError::InvalidOrExpiredToken);
        }

        counter!(REFRESH_ROTATED).increment(1);
        Ok((record, replacement))
    }

    /// Revoke every active token owned by `user_id`. Tokens already revoked
    /// or expired stay as they are; an empty set is a successful no-op.
    pub async fn revoke_all_active_for_user(
        &self,
        user_id: Uuid,
        client_ip: &str,
    ) -> Result<(), AuthError> {
        let now = self.clock.now_utc();
        let revoked = self
            .store
            .revoke_active_tokens_for_user(user_id, now, client_ip)
            .await?;
        if revoked > 0 {
            counter!(TOKENS_REVOKED).increment(revoked as u64);
            tracing::info!(%user_id, revoked, "revoked active refresh tokens");
        }
        Ok(())
    }
}
