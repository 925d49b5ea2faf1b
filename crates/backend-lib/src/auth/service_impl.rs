use crate::auth::jwt::JwtSigner;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh::RefreshTokenManager;
use crate::auth::AuthService;
use crate::clock::Clock;
use crate::domain::{roles, User};
use crate::error::AuthError;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, USER_REGISTERED};
use crate::storage::AuthStore;
use async_trait::async_trait;
use fxauth_common::{AuthResponse, LoginRequest, RegisterRequest};
use metrics::counter;
use std::sync::Arc;
use uuid::Uuid;

/// Default [`AuthService`] over a storage backend, a token signer and a
/// clock. Stateless between calls; one instance serves every request.
pub struct DefaultAuth<S> {
    store: S,
    signer: JwtSigner,
    tokens: RefreshTokenManager<S>,
    clock: Arc<dyn Clock>,
}

impl<S: AuthStore + Clone> DefaultAuth<S> {
    pub fn new(
        store: S,
        signer: JwtSigner,
        clock: Arc<dyn Clock>,
        refresh_ttl_days: i64,
    ) -> Self {
        let tokens = RefreshTokenManager::new(
            store.clone(),
            signer.clone(),
            clock.clone(),
            refresh_ttl_days,
        );
        Self {
            store,
            signer,
            tokens,
            clock,
        }
    }

    fn session_response(
        user: &User,
        roles: Vec<String>,
        access_token: String,
        refresh_token: String,
    ) -> AuthResponse {
        AuthResponse {
            user_id: user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            access_token,
            refresh_token,
            roles,
        }
    }
}

#[async_trait]
impl<S: AuthStore + Clone> AuthService for DefaultAuth<S> {
    async fn register(
        &self,
        request: RegisterRequest,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError> {
        if self
            .store
            .find_user_by_email_or_username(&request.email, &request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUser);
        }

        let now = self.clock.now_utc();
        let user = User::create(
            &request.email,
            &request.username,
            &hash_password(&request.password),
            &request.first_name,
            &request.last_name,
            now,
        )?;
        self.store.insert_user(&user).await?;

        // The default role is a deployment precondition, not user input.
        let default_role = self.store.find_role(roles::USER).await?.ok_or_else(|| {
            AuthError::Configuration(format!("default role {:?} is not seeded", roles::USER))
        })?;
        self.store
            .insert_user_role(user.id(), default_role.id())
            .await?;

        let role_names = vec![roles::USER.to_string()];
        let access_token = self.signer.issue(&user, &role_names)?;
        let refresh_token = self.tokens.issue(user.id(), client_ip).await?;

        counter!(USER_REGISTERED).increment(1);
        tracing::info!(user_id = %user.id(), "registered new user");
        Ok(Self::session_response(
            &user,
            role_names,
            access_token,
            refresh_token.token().to_string(),
        ))
    }

    async fn login(
        &self,
        request: LoginRequest,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError> {
        // Unknown email and wrong password must be indistinguishable to the
        // caller.
        let record = match self.store.find_user_by_email(&request.email).await? {
            Some(record) => record,
            None => {
                counter!(LOGIN_FAILED).increment(1);
                return Err(AuthError::InvalidCredentials);
            },
        };
        if !verify_password(&request.password, record.user.password_hash()) {
            counter!(LOGIN_FAILED).increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now_utc();
        self.store.update_last_login(record.user.id(), now).await?;

        let access_token = self.signer.issue(&record.user, &record.roles)?;
        let refresh_token = self.tokens.issue(record.user.id(), client_ip).await?;

        counter!(LOGIN_SUCCEEDED).increment(1);
        Ok(Self::session_response(
            &record.user,
            record.roles,
            access_token,
            refresh_token.token().to_string(),
        ))
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError> {
        let (record, replacement) = self.tokens.rotate(refresh_token, client_ip).await?;

        // role set is unchanged by rotation
        let access_token = self.signer.issue(&record.user, &record.roles)?;
        Ok(Self::session_response(
            &record.user,
            record.roles,
            access_token,
            replacement.token().to_string(),
        ))
    }

    async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.tokens.revoke_all_active_for_user(user_id, "").await
    }
}
