//! Clock abstraction for determinism.

use chrono::{DateTime, Utc};

/// Source of wall-clock time for session bookkeeping (start time, choice
/// timestamps). Timeouts are driven by the async runtime, not by this trait.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
