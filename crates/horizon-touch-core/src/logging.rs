//! Tracing targets and spans.
//!
//! Nothing here installs a subscriber; applications pick their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_touch::recognizer=trace")
//!     .init();
//! ```
//!
//! Each subsystem logs under its own entry in [`targets`], so recognizer
//! transitions can be followed without timer bookkeeping in the way.

/// Names of the spans opened by [`PerfSpan`] around top-level entry points.
pub mod span_names {
    /// One touch event walking up a view hierarchy.
    pub const DISPATCH: &str = "horizon_touch::dispatch";
    /// One pass over expired timers.
    pub const TIMERS: &str = "horizon_touch::timers";
}

/// `tracing` targets, one per subsystem.
pub mod targets {
    pub const CORE: &str = "horizon_touch_core";
    pub const TIMER: &str = "horizon_touch_core::timer";
    pub const SIGNAL: &str = "horizon_touch_core::signal";
    /// Raw contact tracking and winit conversion.
    pub const TOUCH: &str = "horizon_touch::touch";
    /// State transitions and handler deliveries.
    pub const RECOGNIZER: &str = "horizon_touch::recognizer";
    /// Per-view admission and routing.
    pub const MANAGER: &str = "horizon_touch::manager";
    /// The application-wide block.
    pub const COORDINATOR: &str = "horizon_touch::coordinator";
    pub const REGISTRY: &str = "horizon_touch::registry";
    pub const VIEW: &str = "horizon_touch::view";
}

/// An entered `horizon_touch::perf` span, exited on drop.
#[derive(Debug)]
pub struct PerfSpan {
    _entered: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        Self {
            _entered: tracing::info_span!(target: "horizon_touch::perf", "perf", operation)
                .entered(),
        }
    }
}

/// `tracing::trace!` under the core target.
#[macro_export]
macro_rules! touch_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
