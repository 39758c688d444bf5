//! Logging facilities for Horizon Autocomplete.
//!
//! Horizon Autocomplete uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_autocomplete=debug")
//!         .init();
//! }
//! ```
//!
//! Stale responses are reported at `trace`, vetoes and source failures at
//! `debug`. Nothing is logged above `warn` during normal operation.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_autocomplete_core";
    /// Timer system target.
    pub const TIMER: &str = "horizon_autocomplete_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_autocomplete_core::signal";
    /// Interaction controller target.
    pub const WIDGET: &str = "horizon_autocomplete::widget";
    /// Request sequencing target.
    pub const SEQUENCER: &str = "horizon_autocomplete::sequencer";
    /// Candidate sources target.
    pub const SOURCE: &str = "horizon_autocomplete::source";
    /// Debounce target.
    pub const DEBOUNCER: &str = "horizon_autocomplete::debouncer";
    /// Menu navigation target.
    pub const NAVIGATION: &str = "horizon_autocomplete::navigation";
    /// Performance spans target.
    pub const PERF: &str = "horizon_autocomplete::perf";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_autocomplete::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        assert!(targets::TIMER.starts_with(targets::CORE));
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }
}
