//! Swipe: a fast single-direction flick.

use std::time::Duration;

use horizon_touch_core::Point;

use super::SwipeDirection;
use crate::error::Result;
use crate::options::{GestureOptions, millis};
use crate::recognizer::{Gesture, GestureContext, GestureDetail, GestureEventKind, GestureState};
use crate::registry::FromOptions;

const DEFAULT_CANCEL_PERIOD_MS: u64 = 100;
const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
const DEFAULT_INIT_THRESHOLD: f32 = 5.0;

/// Swipe recognizer.
///
/// Begins once the touch moves past `init_threshold` in an enabled
/// direction, then must travel `swipe_threshold` from where it began within
/// `cancel_period`. Crossing the threshold ends the gesture from inside the
/// move that crossed it; running out of time, or lifting early, cancels it.
#[derive(Debug, Clone)]
pub struct SwipeGesture {
    direction: SwipeDirection,
    cancel_period: Duration,
    swipe_threshold: f32,
    init_threshold: f32,
    swipe_direction: Option<SwipeDirection>,
    initial_location: Point,
    previous_location: Point,
}

impl SwipeGesture {
    pub fn new(
        direction: SwipeDirection,
        cancel_period: Duration,
        swipe_threshold: f32,
        init_threshold: f32,
    ) -> Self {
        Self {
            direction,
            cancel_period,
            swipe_threshold,
            init_threshold,
            swipe_direction: None,
            initial_location: Point::ZERO,
            previous_location: Point::ZERO,
        }
    }

    /// Direction recognized by the last completed swipe.
    pub fn swipe_direction(&self) -> Option<SwipeDirection> {
        self.swipe_direction
    }

    fn cancel(&mut self, ctx: &mut GestureContext<'_>) {
        ctx.disarm_timer();
        ctx.set_state(GestureState::Cancelled);
        ctx.deliver(GestureEventKind::Cancel);
        ctx.reset_touches();
    }
}

impl Default for SwipeGesture {
    fn default() -> Self {
        Self::new(
            SwipeDirection::default(),
            Duration::from_millis(DEFAULT_CANCEL_PERIOD_MS),
            DEFAULT_SWIPE_THRESHOLD,
            DEFAULT_INIT_THRESHOLD,
        )
    }
}

impl FromOptions for SwipeGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        Ok(Self::new(
            options
                .direction
                .map(SwipeDirection::from_bits)
                .unwrap_or_default(),
            millis(options.cancel_period, DEFAULT_CANCEL_PERIOD_MS),
            options.swipe_threshold.unwrap_or(DEFAULT_SWIPE_THRESHOLD),
            options.init_threshold.unwrap_or(DEFAULT_INIT_THRESHOLD),
        ))
    }
}

impl Gesture for SwipeGesture {
    fn did_become_possible(&mut self, ctx: &mut GestureContext<'_>) {
        self.previous_location = ctx.center();
    }

    fn should_begin(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        let moved = ctx.center() - self.previous_location;
        self.direction
            .first_exceeding(moved.x, moved.y, self.init_threshold)
            .is_some()
    }

    fn did_begin(&mut self, ctx: &mut GestureContext<'_>) {
        self.initial_location = ctx.center();
        self.swipe_direction = None;
        ctx.arm_timer(self.cancel_period);
    }

    fn did_change(&mut self, ctx: &mut GestureContext<'_>) {
        let moved = ctx.center() - self.initial_location;
        if let Some(direction) = self
            .direction
            .first_exceeding(moved.x, moved.y, self.swipe_threshold)
        {
            self.swipe_direction = Some(direction);
            ctx.disarm_timer();
            ctx.set_state(GestureState::Ended);
            ctx.deliver(GestureEventKind::End);
            ctx.reset_touches();
        }
    }

    /// Lifting before the threshold was crossed is a cancel.
    fn should_end(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        self.cancel(ctx);
        false
    }

    fn timer_fired(&mut self, ctx: &mut GestureContext<'_>) {
        if ctx.state().is_active() {
            self.cancel(ctx);
        }
    }

    fn detail(&self) -> GestureDetail {
        GestureDetail::Swipe {
            direction: self.swipe_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{EventSource, TimeoutKind};
    use crate::testing::Harness;
    use crate::touch::TouchPhase;

    #[test]
    fn test_swipe_right_ends_inside_move() {
        let mut h = Harness::new(
            "swipe",
            GestureOptions::new()
                .with_direction(SwipeDirection::RIGHT)
                .with_swipe_threshold(50.0),
        );
        h.start(&[(1, 0.0, 10.0)]);
        h.move_to(&[(1, 10.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Began);
        assert_eq!(h.live_timers(), 1);

        h.move_to(&[(1, 70.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Ended);
        assert_eq!(h.kinds(), vec![GestureEventKind::Start, GestureEventKind::End]);

        let end = &h.events()[1];
        assert_eq!(end.source, EventSource::Touch(TouchPhase::Move));
        assert_eq!(
            end.detail,
            GestureDetail::Swipe {
                direction: Some(SwipeDirection::RIGHT)
            }
        );
        assert_eq!(h.live_timers(), 0);
        assert!(h.recognizer().touches().is_empty());
    }

    #[test]
    fn test_thresholds_must_be_exceeded() {
        let mut h = Harness::new(
            "swipe",
            GestureOptions::new()
                .with_direction(SwipeDirection::RIGHT)
                .with_swipe_threshold(50.0),
        );
        h.start(&[(1, 0.0, 10.0)]);
        h.move_to(&[(1, 5.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Possible);

        h.move_to(&[(1, 11.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Began);

        // Began at x = 11; exactly 50 further is not enough.
        h.move_to(&[(1, 61.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Changed);
        h.move_to(&[(1, 62.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Ended);
        assert_eq!(h.kinds(), vec![GestureEventKind::Start, GestureEventKind::Change, GestureEventKind::End]);
    }

    #[test]
    fn test_lift_after_end_does_not_cancel() {
        let mut h = Harness::new("swipe", GestureOptions::new());
        h.start(&[(1, 0.0, 10.0)]);
        h.move_to(&[(1, 10.0, 10.0)]);
        h.move_to(&[(1, 70.0, 10.0)]);
        h.end(&[(1, 70.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Ended);
        assert_eq!(h.kinds(), vec![GestureEventKind::Start, GestureEventKind::End]);
    }

    #[test]
    fn test_early_lift_cancels() {
        let mut h = Harness::new("swipe", GestureOptions::new());
        h.start(&[(1, 0.0, 10.0)]);
        h.move_to(&[(1, 10.0, 10.0)]);
        h.end(&[(1, 20.0, 10.0)]);
        assert_eq!(h.state(), GestureState::Cancelled);
        assert_eq!(h.kinds(), vec![GestureEventKind::Start, GestureEventKind::Cancel]);
        assert_eq!(h.live_timers(), 0);
    }

    #[test]
    fn test_cancel_period_elapses() {
        let mut h = Harness::new("swipe", GestureOptions::new().with_cancel_period(100));
        h.start(&[(1, 0.0, 10.0)]);
        h.move_to(&[(1, 10.0, 10.0)]);
        assert_eq!(h.advance(99), 0);
        assert_eq!(h.advance(1), 1);

        assert_eq!(h.state(), GestureState::Cancelled);
        let cancel = h.events().pop().unwrap();
        assert_eq!(cancel.kind, GestureEventKind::Cancel);
        assert_eq!(cancel.source, EventSource::Timeout(TimeoutKind::Cancel));

        // Further movement is ignored once cancelled.
        h.move_to(&[(1, 200.0, 10.0)]);
        assert_eq!(h.kinds().len(), 2);
    }

    #[test]
    fn test_only_enabled_directions_begin() {
        let mut h = Harness::new(
            "swipe",
            GestureOptions::new().with_direction(SwipeDirection::UP),
        );
        h.start(&[(1, 0.0, 100.0)]);
        h.move_to(&[(1, 80.0, 100.0)]);
        assert_eq!(h.state(), GestureState::Possible);
        h.move_to(&[(1, 80.0, 90.0)]);
        assert_eq!(h.state(), GestureState::Began);
    }
}
