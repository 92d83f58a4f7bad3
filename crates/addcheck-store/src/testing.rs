//! Deterministic clocks for tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use addcheck_core::traits::Clock;

/// Always returns the same instant.
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at `secs` seconds after the Unix epoch.
    pub fn at(secs: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Advances by one second on every call.
pub struct SteppingClock {
    next: AtomicI64,
}

impl SteppingClock {
    pub fn starting_at(secs: i64) -> Self {
        Self {
            next: AtomicI64::new(secs),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(1, Ordering::Relaxed);
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
    }
}
