//! Tap: one or more quick touches without movement.

use std::time::Duration;

use horizon_touch_core::Point;

use crate::error::{GestureError, Result};
use crate::options::{GestureOptions, millis};
use crate::recognizer::{Gesture, GestureContext, GestureDetail, GestureEventKind, GestureState};
use crate::registry::FromOptions;

const DEFAULT_NUMBER_OF_TAPS: u32 = 1;
const DEFAULT_DELAY_MS: u64 = 500;
const DEFAULT_TAP_THRESHOLD: f32 = 10.0;

/// Discrete single-touch tap recognizer, including multi-tap sequences.
///
/// Each touch-down counts one tap. Until `number_of_taps` taps have been
/// counted, a lift leaves the recognizer `Cancelled` with the inter-tap timer
/// still armed; the next touch-down begins it again and keeps counting. If
/// the timer fires first the sequence is dropped and `Cancel` is delivered.
#[derive(Debug, Clone)]
pub struct TapGesture {
    number_of_taps: u32,
    delay_between_taps: Duration,
    tap_threshold: f32,
    taps: u32,
    waiting_for_more: bool,
    initial_location: Point,
}

impl TapGesture {
    pub fn new(number_of_taps: u32, delay_between_taps: Duration, tap_threshold: f32) -> Self {
        Self {
            number_of_taps: number_of_taps.max(1),
            delay_between_taps,
            tap_threshold,
            taps: 0,
            waiting_for_more: false,
            initial_location: Point::ZERO,
        }
    }

    /// Taps counted in the current sequence.
    pub fn taps(&self) -> u32 {
        self.taps
    }

    fn reset(&mut self) {
        self.taps = 0;
        self.waiting_for_more = false;
    }
}

impl Default for TapGesture {
    fn default() -> Self {
        Self::new(
            DEFAULT_NUMBER_OF_TAPS,
            Duration::from_millis(DEFAULT_DELAY_MS),
            DEFAULT_TAP_THRESHOLD,
        )
    }
}

impl FromOptions for TapGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        if let Some(required) = options.number_of_required_touches.filter(|&n| n != 1) {
            return Err(GestureError::UnsupportedTouchCount {
                gesture: super::TAP.to_string(),
                required,
                supported: 1,
            });
        }
        Ok(Self::new(
            options.number_of_taps.unwrap_or(DEFAULT_NUMBER_OF_TAPS),
            millis(options.delay_between_taps, DEFAULT_DELAY_MS),
            options.tap_threshold.unwrap_or(DEFAULT_TAP_THRESHOLD),
        ))
    }
}

impl Gesture for TapGesture {
    fn is_discrete(&self) -> bool {
        true
    }

    fn did_begin(&mut self, ctx: &mut GestureContext<'_>) {
        if !self.waiting_for_more {
            self.taps = 0;
        }
        self.initial_location = ctx.center();
        self.taps += 1;
        self.waiting_for_more = self.taps < self.number_of_taps;

        if self.waiting_for_more {
            ctx.arm_timer(self.delay_between_taps);
        } else {
            ctx.disarm_timer();
        }
    }

    fn should_end(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        let stayed = ctx.center().distance_to(self.initial_location) < self.tap_threshold;
        if stayed && self.waiting_for_more {
            ctx.keep_waiting();
            return false;
        }
        stayed
    }

    fn did_end(&mut self, _ctx: &mut GestureContext<'_>) {
        self.waiting_for_more = false;
    }

    fn did_cancel(&mut self, _ctx: &mut GestureContext<'_>) {
        self.reset();
    }

    fn timer_fired(&mut self, ctx: &mut GestureContext<'_>) {
        self.reset();
        ctx.set_state(GestureState::Cancelled);
        ctx.deliver(GestureEventKind::Cancel);
        ctx.reset_touches();
    }

    fn detail(&self) -> GestureDetail {
        GestureDetail::Tap { taps: self.taps }
    }
}
