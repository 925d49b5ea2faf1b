// =========================
// crates/backend-lib/tests/auth_flow_tests.rs
// =========================
//! End-to-end tests for the register/login/refresh/logout flow, driven
//! through the service boundary the HTTP layer calls into.
use std::sync::Arc;

use backend_lib::auth::{AuthService, DefaultAuth, JwtSigner, OsRandom};
use backend_lib::clock::SystemClock;
use backend_lib::config::JwtSettings;
use backend_lib::error::AuthError;
use backend_lib::storage::{seed_default_roles, AuthStore, MemoryStore};
use fxauth_common::{LoginRequest, RegisterRequest};

fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret_key: "integration-test-secret".to_string(),
        issuer: "fxauth".to_string(),
        audience: "fxauth".to_string(),
        access_token_minutes: 15,
    }
}

fn signer() -> JwtSigner {
    JwtSigner::from_settings(&jwt_settings(), Arc::new(SystemClock), Arc::new(OsRandom)).unwrap()
}

async fn service() -> (DefaultAuth<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    seed_default_roles(&store).await.unwrap();
    let auth = DefaultAuth::new(store.clone(), signer(), Arc::new(SystemClock), 7);
    (auth, store)
}

fn register_request(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: "pw123".to_string(),
        first_name: "A".to_string(),
        last_name: "Lice".to_string(),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_issues_a_full_session() {
    let (auth, _store) = service().await;

    let session = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    assert_eq!(session.email, "a@x.com");
    assert_eq!(session.username, "alice");
    assert_eq!(session.roles, vec!["User".to_string()]);
    assert!(!session.refresh_token.is_empty());

    // the access token verifies and carries the same identity
    let claims = signer().verify(&session.access_token).unwrap();
    assert_eq!(claims.sub, session.user_id.to_string());
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.roles, vec!["User".to_string()]);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_on_either_key() {
    let (auth, _store) = service().await;
    auth.register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    // same email, different username
    let result = auth
        .register(register_request("a@x.com", "alice2"), "10.0.0.1")
        .await;
    assert!(matches!(result, Err(AuthError::DuplicateUser)));

    // same username, different email
    let result = auth
        .register(register_request("b@x.com", "alice"), "10.0.0.1")
        .await;
    assert!(matches!(result, Err(AuthError::DuplicateUser)));
}

#[tokio::test]
async fn registration_is_visible_to_login() {
    let (auth, _store) = service().await;
    let registered = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    let logged_in = auth
        .login(login_request("a@x.com", "pw123"), "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(logged_in.user_id, registered.user_id);
    assert_eq!(logged_in.roles, registered.roles);
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let (auth, _store) = service().await;
    auth.register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    let wrong_password = auth
        .login(login_request("a@x.com", "wrongpw"), "10.0.0.1")
        .await;
    let unknown_email = auth
        .login(login_request("nobody@x.com", "pw123"), "10.0.0.1")
        .await;

    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn refresh_rotates_and_preserves_identity() {
    let (auth, _store) = service().await;
    let session = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    let refreshed = auth.refresh(&session.refresh_token, "10.0.0.2").await.unwrap();
    assert_eq!(refreshed.user_id, session.user_id);
    assert_eq!(refreshed.roles, session.roles);
    assert_ne!(refreshed.refresh_token, session.refresh_token);

    // the spent token cannot be used again
    let replay = auth.refresh(&session.refresh_token, "10.0.0.3").await;
    assert!(matches!(replay, Err(AuthError::InvalidOrExpiredToken)));

    // but the replacement still works
    assert!(auth.refresh(&refreshed.refresh_token, "10.0.0.2").await.is_ok());
}

#[tokio::test]
async fn register_fails_when_role_catalog_is_missing() {
    // unseeded store: a deployment fault, not a user error
    let store = MemoryStore::new();
    let auth = DefaultAuth::new(store, signer(), Arc::new(SystemClock), 7);

    let result = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await;
    assert!(matches!(result, Err(AuthError::Configuration(_))));
}

#[tokio::test]
async fn logout_with_nothing_active_succeeds() {
    let (auth, _store) = service().await;
    let session = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();

    auth.logout(session.user_id).await.unwrap();
    // a second pass over already-revoked tokens is still Ok
    auth.logout(session.user_id).await.unwrap();
}

#[tokio::test]
async fn full_session_scenario() {
    let (auth, store) = service().await;

    let registered = auth
        .register(register_request("a@x.com", "alice"), "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(registered.roles, vec!["User".to_string()]);

    let failed = auth
        .login(login_request("a@x.com", "wrongpw"), "10.0.0.1")
        .await;
    assert!(matches!(failed, Err(AuthError::InvalidCredentials)));

    let session = auth
        .login(login_request("a@x.com", "pw123"), "10.0.0.1")
        .await
        .unwrap();

    // login stamped the account
    let record = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert!(record.user.last_login_at().is_some());

    let refreshed = auth.refresh(&session.refresh_token, "10.0.0.1").await.unwrap();
    let replay = auth.refresh(&session.refresh_token, "10.0.0.1").await;
    assert!(matches!(replay, Err(AuthError::InvalidOrExpiredToken)));

    auth.logout(session.user_id).await.unwrap();

    // logout killed the newest token too
    let after_logout = auth.refresh(&refreshed.refresh_token, "10.0.0.1").await;
    assert!(matches!(after_logout, Err(AuthError::InvalidOrExpiredToken)));
}
