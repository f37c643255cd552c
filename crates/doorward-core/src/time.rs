//! Wall-clock timestamps for audit records.
//!
//! Controller timing runs on monotonic instants; only event records carry
//! wall-clock time, rendered as `YYYY-MM-DD HH:MM:SS` in the configured
//! offset.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::constants::TIMESTAMP_FORMAT;

/// Source of formatted wall-clock timestamps.
pub trait WallClock {
    /// Current time formatted with [`TIMESTAMP_FORMAT`].
    fn timestamp(&self) -> String;
}

/// System clock shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Clock at `hours` east of UTC. Out-of-range offsets fall back to UTC.
    pub fn with_offset_hours(hours: i32) -> Self {
        let offset = FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_offset_hours(0)
    }
}

impl WallClock for SystemClock {
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Clock frozen at one instant, for tests and replay.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl WallClock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}
