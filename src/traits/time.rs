//! Clock abstraction so expiry and timestamp logic is testable.

/// Provides the current wall-clock time.
pub trait TimeProvider: Send + Sync {
    /// Current unix timestamp in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Production implementation backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeProvider for SystemTime {
    fn now_ms(&self) -> u64 {
        chrono::Local::now().timestamp_millis() as u64
    }
}

impl SystemTime {
    pub const fn new() -> Self {
        Self
    }
}
