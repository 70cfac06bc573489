//! Touch-hold: a touch kept down until a timer completes the gesture.

use std::time::Duration;

use horizon_touch_core::Point;

use crate::error::Result;
use crate::options::{GestureOptions, millis};
use crate::recognizer::{Gesture, GestureContext, GestureEventKind, GestureState};
use crate::registry::FromOptions;

const DEFAULT_HOLD_PERIOD_MS: u64 = 2000;
const DEFAULT_MOVE_THRESHOLD: f32 = 50.0;

/// Discrete recognizer that ends while the finger is still down.
///
/// The hold timer ends the gesture; lifting first, or moving further than
/// `move_threshold`, cancels it.
#[derive(Debug, Clone)]
pub struct TouchHoldGesture {
    hold_period: Duration,
    move_threshold: f32,
    initial_location: Point,
}

impl TouchHoldGesture {
    pub fn new(hold_period: Duration, move_threshold: f32) -> Self {
        Self {
            hold_period,
            move_threshold,
            initial_location: Point::ZERO,
        }
    }
}

impl Default for TouchHoldGesture {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_HOLD_PERIOD_MS),
            DEFAULT_MOVE_THRESHOLD,
        )
    }
}

impl FromOptions for TouchHoldGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        Ok(Self::new(
            millis(options.hold_period, DEFAULT_HOLD_PERIOD_MS),
            options.move_threshold.unwrap_or(DEFAULT_MOVE_THRESHOLD),
        ))
    }
}

impl Gesture for TouchHoldGesture {
    fn is_discrete(&self) -> bool {
        true
    }

    fn did_begin(&mut self, ctx: &mut GestureContext<'_>) {
        self.initial_location = ctx.center();
        ctx.arm_timer(self.hold_period);
    }

    fn did_change(&mut self, ctx: &mut GestureContext<'_>) {
        if ctx.center().distance_to(self.initial_location) >= self.move_threshold {
            ctx.disarm_timer();
            ctx.set_state(GestureState::Cancelled);
        }
    }

    /// A lift before the hold timer is always a cancel.
    fn should_end(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        ctx.disarm_timer();
        false
    }

    fn timer_fired(&mut self, ctx: &mut GestureContext<'_>) {
        if ctx.state().is_active() {
            ctx.set_state(GestureState::Ended);
            ctx.deliver(GestureEventKind::End);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{EventSource, TimeoutKind};
    use crate::testing::Harness;

    #[test]
    fn test_hold_ends_from_timer() {
        let mut h = Harness::new("touchHold", GestureOptions::new().with_hold_period(1000));
        h.start(&[(1, 5.0, 5.0)]);
        assert_eq!(h.state(), GestureState::Began);
        assert_eq!(h.live_timers(), 1);

        assert_eq!(h.advance(999), 0);
        assert_eq!(h.advance(1), 1);
        assert_eq!(h.state(), GestureState::Ended);

        let events = h.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, GestureEventKind::End);
        assert_eq!(events[0].source, EventSource::Timeout(TimeoutKind::End));
        // The finger is still down.
        assert_eq!(events[0].touches.len(), 1);

        h.end(&[(1, 5.0, 5.0)]);
        assert_eq!(h.state(), GestureState::Ended);
        assert_eq!(h.kinds().len(), 1);
    }

    #[test]
    fn test_early_lift_cancels() {
        let mut h = Harness::new("touchHold", GestureOptions::new());
        h.start(&[(1, 5.0, 5.0)]);
        h.advance(500);
        h.end(&[(1, 5.0, 5.0)]);
        assert_eq!(h.state(), GestureState::Cancelled);
        assert_eq!(h.live_timers(), 0);
        assert_eq!(h.advance(5000), 0);
        assert!(h.kinds().is_empty());
    }

    #[test]
    fn test_moving_away_cancels() {
        let mut h = Harness::new("touchHold", GestureOptions::new().with_move_threshold(20.0));
        h.start(&[(1, 0.0, 0.0)]);
        h.move_to(&[(1, 10.0, 0.0)]);
        assert_eq!(h.state(), GestureState::Changed);
        assert_eq!(h.live_timers(), 1);

        h.move_to(&[(1, 30.0, 0.0)]);
        assert_eq!(h.state(), GestureState::Cancelled);
        assert_eq!(h.live_timers(), 0);
        assert_eq!(h.advance(5000), 0);
        assert!(h.kinds().is_empty());
    }
}
