//! Monotonic deadlines for the controller's timed sub-states.

use std::time::{Duration, Instant};

/// A window of fixed length starting at a known instant.
///
/// Expiry is strict: a deadline of 10 s started at `t` is still running at
/// `t + 10s` and expired at any later instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    timeout: Duration,
}

impl Deadline {
    pub fn start(now: Instant, timeout: Duration) -> Self {
        Self {
            started: now,
            timeout,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the window has begun as of `now`.
    pub fn has_started(&self, now: Instant) -> bool {
        now >= self.started
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    pub fn has_timed_out(&self, now: Instant) -> bool {
        self.elapsed(now) > self.timeout
    }

    /// Remaining time, `None` once timed out.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        if self.has_timed_out(now) {
            return None;
        }
        Some(self.timeout - self.elapsed(now))
    }

    /// Remaining time in whole seconds, rounded up.
    pub fn seconds_remaining(&self, now: Instant) -> u64 {
        self.time_remaining(now)
            .map(|left| left.as_millis().div_ceil(1000) as u64)
            .unwrap_or(0)
    }
}
