//! Wall-clock time abstraction.
//!
//! Every engine operation that needs "now" takes a `&dyn Clock` rather than
//! calling `SystemTime::now()` directly, so tests can drive decay and
//! expiry math with a fixed or manually-advanced clock.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A point in time, stored as whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    /// Hours elapsed from `self` to `other`. Negative if `other` precedes `self`.
    pub fn hours_until(&self, other: Timestamp) -> f64 {
        (other.0 as i64 - self.0 as i64) as f64 / 3600.0
    }

    /// Days elapsed from `self` to `other`, as a fractional value.
    pub fn days_until(&self, other: Timestamp) -> f64 {
        self.hours_until(other) / 24.0
    }

    pub fn plus_hours(&self, hours: f64) -> Timestamp {
        Timestamp(((self.0 as f64) + hours * 3600.0).max(0.0) as u64)
    }

    pub fn plus_secs(&self, secs: u64) -> Timestamp {
        Timestamp(self.0 + secs)
    }
}

/// Injectable source of "now", mirroring how the engine takes its random
/// number generator as a parameter rather than reaching for a global.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Timestamp(secs)
    }
}

/// Deterministic clock for tests: reports a fixed instant unless manually
/// advanced.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl FixedClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(start.0)),
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        self.now
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance_hours(&self, hours: f64) {
        self.advance_secs((hours * 3600.0) as u64);
    }

    pub fn set(&self, at: Timestamp) {
        self.now.store(at.0, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.load(std::sync::atomic::Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_until_is_positive_forward() {
        let a = Timestamp::from_secs(0);
        let b = Timestamp::from_secs(3600 * 5);
        assert_eq!(a.hours_until(b), 5.0);
    }

    #[test]
    fn days_until_divides_hours_by_24() {
        let a = Timestamp::from_secs(0);
        let b = a.plus_hours(48.0);
        assert_eq!(a.days_until(b), 2.0);
    }

    #[test]
    fn fixed_clock_advances_deterministically() {
        let clock = FixedClock::new(Timestamp::from_secs(0));
        assert_eq!(clock.now(), Timestamp::from_secs(0));
        clock.advance_hours(2.0);
        assert_eq!(clock.now(), Timestamp::from_secs(7200));
    }
}
