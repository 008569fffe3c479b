use chrono::Utc;

/// Source of block timestamps (Unix seconds).
///
/// Returns `None` when no time can be read; block construction maps that
/// to [`LedgerError::ClockUnavailable`](crate::LedgerError::ClockUnavailable).
pub trait Clock {
    fn now(&self) -> Option<i64>;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Current Unix time in seconds. Reading the system clock cannot fail.
    pub fn timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Option<i64> {
        Some(self.timestamp())
    }
}

/// Always reports the same instant. Handy for reproducible hashes.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> Option<i64> {
        Some(self.0)
    }
}
