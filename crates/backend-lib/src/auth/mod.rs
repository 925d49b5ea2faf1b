// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod jwt;
pub mod password;
pub mod refresh;
pub mod token_generator;
mod service;
mod service_impl;

pub use jwt::{AccessClaims, JwtSigner};
pub use password::{hash_password, verify_password};
pub use refresh::RefreshTokenManager;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token_generator::{OsRandom, SecureRandom};
