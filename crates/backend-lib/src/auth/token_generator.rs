// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Secure random byte source for opaque token material.
This module provides the entropy behind refresh-token secrets. Production
wiring uses OS-provided entropy; tests may substitute a recorded source. */
use rand::rngs::OsRng;
use rand::RngCore;

/// Supplies cryptographically secure random bytes.
pub trait SecureRandom: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Random source backed by OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_bytes() {
        // Fill two buffers and verify they're different
        let mut first = [0u8; 64];
        let mut second = [0u8; 64];
        OsRandom.fill_bytes(&mut first);
        OsRandom.fill_bytes(&mut second);

        assert_ne!(first, second);
        assert_ne!(first, [0u8; 64]);
    }
}
