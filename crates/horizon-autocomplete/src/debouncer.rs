//! Input debouncing.
//!
//! Each keystroke (re)starts a quiescence window. Only when the window runs
//! out without another keystroke does [`Debouncer::poll_at`] report that the
//! pending action should run.

use std::time::{Duration, Instant};

use horizon_autocomplete_core::logging::targets;
use horizon_autocomplete_core::{TimerId, TimerManager};

/// Coalesces bursts of input into one delayed trigger.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timers: TimerManager,
    pending: Option<TimerId>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: TimerManager::new(),
            pending: None,
        }
    }

    /// Cancel any pending trigger and start a new window at `now`.
    ///
    /// A zero delay still waits for the next poll.
    pub fn schedule(&mut self, now: Instant) -> TimerId {
        self.cancel();
        let id = self.timers.start_one_shot_at(now, self.delay);
        self.pending = Some(id);
        tracing::trace!(target: targets::DEBOUNCER, ?id, delay = ?self.delay, "lookup scheduled");
        id
    }

    /// Cancel the pending trigger, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(id) => self.timers.stop(id).is_ok(),
            None => false,
        }
    }

    /// Whether a trigger is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the armed trigger fires.
    pub fn time_until_fire(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next_at(now)
    }

    /// Returns `true` exactly once when the armed window has elapsed at `now`.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let fired = self.timers.process_expired_at(now);
        match self.pending {
            Some(id) if fired.contains(&id) => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
