// ============================
// crates/backend-lib/src/http_router.rs
// ============================
//! HTTP router and request handling for the auth API.
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::post,
    Json, Router,
};
use fxauth_common::{
    AuthResponse, LoginRequest, LogoutResponse, RefreshTokenRequest, RegisterRequest,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::AuthError;
use crate::storage::AuthStore;
use crate::validation;
use crate::AppState;

/// Create the auth API router
pub fn create_router<S: AuthStore + Clone + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler::<S>))
        .route("/api/auth/login", post(login_handler::<S>))
        .route("/api/auth/refresh", post(refresh_handler::<S>))
        .route("/api/auth/logout", post(logout_handler::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn register_handler<S: AuthStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    validation::validate_register(&request)?;
    let response = state
        .auth
        .register(request, &addr.ip().to_string())
        .await?;
    Ok(Json(response))
}

async fn login_handler<S: AuthStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    validation::validate_login(&request)?;
    let response = state.auth.login(request, &addr.ip().to_string()).await?;
    Ok(Json(response))
}

async fn refresh_handler<S: AuthStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    validation::validate_refresh_token(&request.refresh_token)?;
    let response = state
        .auth
        .refresh(&request.refresh_token, &addr.ip().to_string())
        .await?;
    Ok(Json(response))
}

/// Logout revokes every active refresh token of the caller. The caller is
/// whoever the verified bearer token says it is; there is no way to log out
/// another account.
async fn logout_handler<S: AuthStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AuthError> {
    let claims = state.signer.verify(bearer_token(&headers)?)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

    state.auth.logout(user_id).await?;
    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::InvalidToken("missing bearer credentials".to_string()))
}
