use async_trait::async_trait;
use fxauth_common::{AuthResponse, LoginRequest, RegisterRequest};
use uuid::Uuid;

use crate::error::AuthError;

/// The four operations the transport layer may call into. Everything else
/// in this crate sits behind them.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(
        &self,
        request: RegisterRequest,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError>;
    async fn login(
        &self,
        request: LoginRequest,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError>;
    async fn refresh(
        &self,
        refresh_token: &str,
        client_ip: &str,
    ) -> Result<AuthResponse, AuthError>;
    async fn logout(&self, user_id: Uuid) -> Result<(), AuthError>;
}
