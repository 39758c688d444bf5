//! Time sources.
//!
//! Widgets read the current instant through a [`Clock`] so that debounce
//! windows can be driven by a [`ManualClock`] in tests and by
//! [`SystemClock`] everywhere else.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Abstraction over monotonic time sources.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Elapsed duration since a previous instant.
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

/// Production clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual clock that only moves when [`advance`](Self::advance) is called.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the widget under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock anchored at the current wall-clock instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock anchored at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Move time forward by `millis` milliseconds.
    pub fn advance_ms(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance_ms(250);
        assert_eq!(clock.now(), start + Duration::from_millis(250));
        assert_eq!(clock.elapsed_since(start), Duration::from_millis(250));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
