// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the fxauth credential service.

pub mod auth;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_router;
pub mod metrics;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, JwtSigner, OsRandom};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::error::AuthError;
use crate::storage::AuthStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Access-token signer, used by the router to verify bearer credentials
    pub signer: JwtSigner,
    /// Settings
    pub settings: Arc<Settings>,
    /// Storage backend
    pub store: S,
}

impl<S: AuthStore + Clone + 'static> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: &Settings) -> Result<Self, AuthError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let signer = JwtSigner::from_settings(&settings.jwt, clock.clone(), Arc::new(OsRandom))?;
        let auth: Arc<dyn AuthService> = Arc::new(DefaultAuth::new(
            store.clone(),
            signer.clone(),
            clock,
            settings.refresh.ttl_days,
        ));

        Ok(Self {
            auth,
            signer,
            settings: Arc::new(settings.clone()),
            store,
        })
    }
}
