//! Clock Source
//!
//! "Now" is injected so date and round-id logic stays deterministic
//! under test. Only the outermost caller uses the real system clock.

use chrono::{DateTime, TimeZone, Utc};

/// Source of the current instant.
pub trait Clock {
    /// Current UTC instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current epoch time in milliseconds.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant (tests, replays).
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at midnight UTC of the given calendar day.
    ///
    /// Returns `None` for an invalid date.
    pub fn at_date(year: i32, month: u32, day: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
