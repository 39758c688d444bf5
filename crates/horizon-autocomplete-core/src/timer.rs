//! Timer system for Horizon Autocomplete.
//!
//! Provides one-shot timers driven by explicit instants. The owner decides
//! when "now" is (usually from a [`Clock`](crate::Clock)) and calls
//! [`TimerManager::process_expired_at`] from its poll loop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should fire.
    fire_time: Instant,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    /// Insertion order, keeps timers with equal fire times FIFO.
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Manages one-shot timers.
///
/// Stopped timers are removed from the id table immediately and skipped
/// lazily when their queue entry surfaces.
#[derive(Debug)]
pub struct TimerManager {
    /// All armed timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
    next_sequence: u64,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    ///
    /// A zero duration fires on the next call to
    /// [`process_expired_at`](Self::process_expired_at), never synchronously.
    pub fn start_one_shot_at(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_time = now + duration;
        let id = self.timers.insert(TimerData { fire_time });
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer armed");
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns an error if the timer already fired or was stopped.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => {
                tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
                Ok(())
            }
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Check if a timer is still armed.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next_at(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Process all timers due at `now`, in fire-time order.
    ///
    /// Returns the ids of the timers that fired. Fired timers are removed.
    #[tracing::instrument(skip(self), target = "horizon_autocomplete_core::timer", level = "trace")]
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }

        fired
    }

    /// Stop every armed timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Get the number of armed timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_one_shot_at(start, Duration::from_millis(300));

        assert!(timers.process_expired_at(start + Duration::from_millis(299)).is_empty());
        assert_eq!(timers.process_expired_at(start + Duration::from_millis(300)), vec![id]);
        assert!(timers.process_expired_at(start + Duration::from_secs(10)).is_empty());
        assert!(!timers.is_active(id));
    }

    #[test]
    fn test_zero_duration_is_deferred() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_one_shot_at(start, Duration::ZERO);

        assert!(timers.is_active(id));
        assert_eq!(timers.process_expired_at(start), vec![id]);
    }

    #[test]
    fn test_stop_timer() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_one_shot_at(start, Duration::from_millis(10));

        assert!(timers.stop(id).is_ok());
        assert!(timers.stop(id).is_err());
        assert!(timers.process_expired_at(start + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.time_until_next_at(start), None);
    }

    #[test]
    fn test_fire_order_and_ties() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let late = timers.start_one_shot_at(start, Duration::from_millis(20));
        let first = timers.start_one_shot_at(start, Duration::from_millis(10));
        let second = timers.start_one_shot_at(start, Duration::from_millis(10));

        let fired = timers.process_expired_at(start + Duration::from_millis(50));
        assert_eq!(fired, vec![first, second, late]);
    }

    #[test]
    fn test_time_until_next() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_one_shot_at(start, Duration::from_millis(300));

        assert_eq!(
            timers.time_until_next_at(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            timers.time_until_next_at(start + Duration::from_millis(400)),
            Some(Duration::ZERO)
        );
        assert_eq!(timers.active_count(), 1);
        timers.clear();
        assert_eq!(timers.active_count(), 0);
    }
}
