// ============================
// crates/backend-lib/src/clock.rs
// ============================
//! Injectable time source.

use chrono::{DateTime, Utc};

/// Supplies the current UTC instant. Production wiring uses [`SystemClock`];
/// tests substitute fixed or stepping clocks to pin expiry boundaries.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
