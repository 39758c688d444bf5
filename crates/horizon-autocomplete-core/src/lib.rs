//! Core systems for Horizon Autocomplete.
//!
//! This crate provides the widget-agnostic building blocks the autocomplete
//! widget is assembled from:
//!
//! - **Signal/Slot System**: Per-widget typed notifications, including
//!   vetoable signals whose listeners can cancel an operation
//! - **Timers**: One-shot timers driven by explicit instants
//! - **Clocks**: Wall-clock and manually advanced time sources
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_autocomplete_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_autocomplete_core::{Clock, ManualClock, TimerManager};
//!
//! let clock = ManualClock::new();
//! let mut timers = TimerManager::new();
//! let id = timers.start_one_shot_at(clock.now(), Duration::from_millis(300));
//!
//! clock.advance_ms(300);
//! assert_eq!(timers.process_expired_at(clock.now()), vec![id]);
//! ```

mod clock;
mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result, TimerError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Propagation, Signal, VetoSignal};
pub use timer::{TimerId, TimerManager};
