//! Millisecond clock for upload timestamps.
//!
//! Wall-clock time can step backwards (NTP adjustments) and concurrent
//! handlers can race on reading it, so readings are clamped to never go
//! below the last value handed out.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicI64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current Unix time in milliseconds, non-decreasing across calls.
    pub fn now_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self.last.fetch_max(now, Ordering::AcqRel);
        prev.max(now)
    }
}
