//! Core systems for Horizon Touch.
//!
//! This crate provides the gesture-agnostic building blocks used by
//! `horizon-touch`:
//!
//! - **Geometry**: [`Point`] with distance, midpoint and angle helpers
//! - **Clocks**: the [`Clock`] trait, a real [`SystemClock`] and a test [`ManualClock`]
//! - **Timers**: a polled one-shot [`TimerQueue`] whose timers carry an owner tag
//! - **Signal/Slot System**: synchronous change notification
//! - **Property System**: change-detecting properties and cached bindings
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_touch_core::{Clock, ManualClock, TimerQueue};
//!
//! let clock = ManualClock::new();
//! let mut timers = TimerQueue::new();
//! let id = timers.start(clock.now(), Duration::from_millis(500), "press");
//!
//! clock.advance_ms(499);
//! assert!(timers.pop_expired(clock.now()).is_empty());
//!
//! clock.advance_ms(1);
//! assert_eq!(timers.pop_expired(clock.now()), vec![(id, "press")]);
//! ```

pub mod clock;
mod error;
pub mod geometry;
pub mod logging;
pub mod property;
pub mod signal;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result, TimerError};
pub use geometry::Point;
pub use logging::PerfSpan;
pub use property::{Binding, Property};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{SharedTimerQueue, TimerId, TimerQueue};
