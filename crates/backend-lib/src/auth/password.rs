// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Single-round unsalted SHA-256 over the UTF-8 bytes, standard-alphabet
//! base64. Every stored credential is in this format and verification is
//! exact recomputation, so swapping in a salted KDF invalidates the whole
//! user table; that upgrade is a migration of its own, not an edit here.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// Hash a password for storage. Deterministic: the same input always
/// produces the same digest. Empty input is hashed as-is.
pub fn hash_password(plain: &str) -> String {
    let digest = Sha256::digest(plain.as_bytes());
    STANDARD.encode(digest)
}

/// Verify a password against a stored hash
pub fn verify_password(plain: &str, hash: &str) -> bool {
    hash_password(plain) == hash
}
