//! Press: a touch held in place for a minimum period, then lifted.

use std::time::{Duration, Instant};

use horizon_touch_core::Point;

use crate::error::Result;
use crate::options::{GestureOptions, millis};
use crate::recognizer::{Gesture, GestureContext};
use crate::registry::FromOptions;

const DEFAULT_PRESS_PERIOD_MS: u64 = 500;
const DEFAULT_MOVE_THRESHOLD: f32 = 10.0;

/// Discrete press recognizer.
///
/// Completes on lift if the touch stayed within `move_threshold` and was
/// held for at least `press_period`. Unlike touch-hold it uses no timer; the
/// hold time is measured from touch timestamps.
#[derive(Debug, Clone)]
pub struct PressGesture {
    press_period: Duration,
    move_threshold: f32,
    initial_location: Point,
    initial_timestamp: Option<Instant>,
}

impl PressGesture {
    pub fn new(press_period: Duration, move_threshold: f32) -> Self {
        Self {
            press_period,
            move_threshold,
            initial_location: Point::ZERO,
            initial_timestamp: None,
        }
    }
}

impl Default for PressGesture {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_PRESS_PERIOD_MS),
            DEFAULT_MOVE_THRESHOLD,
        )
    }
}

impl FromOptions for PressGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        Ok(Self::new(
            millis(options.press_period_threshold, DEFAULT_PRESS_PERIOD_MS),
            options.move_threshold.unwrap_or(DEFAULT_MOVE_THRESHOLD),
        ))
    }
}

impl Gesture for PressGesture {
    fn is_discrete(&self) -> bool {
        true
    }

    fn did_begin(&mut self, ctx: &mut GestureContext<'_>) {
        self.initial_location = ctx.center();
        self.initial_timestamp = ctx.touches().timestamp();
    }

    fn should_end(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        let stayed = ctx.center().distance_to(self.initial_location) < self.move_threshold;
        let held = match (ctx.touches().timestamp(), self.initial_timestamp) {
            (Some(now), Some(start)) => now.saturating_duration_since(start) >= self.press_period,
            _ => false,
        };
        stayed && held
    }

    fn did_end(&mut self, _ctx: &mut GestureContext<'_>) {
        self.initial_timestamp = None;
    }

    fn did_cancel(&mut self, _ctx: &mut GestureContext<'_>) {
        self.initial_timestamp = None;
    }
}
