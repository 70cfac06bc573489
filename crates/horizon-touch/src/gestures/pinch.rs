//! Pinch: two touches moving closer together or further apart.

use std::time::Instant;

use crate::error::Result;
use crate::options::GestureOptions;
use crate::recognizer::{Gesture, GestureContext, GestureDetail};
use crate::registry::FromOptions;

const DEFAULT_DELTA_THRESHOLD: f32 = 5.0;

/// Continuous two-touch gesture publishing a scale ratio and velocity.
///
/// `scale` is relative to the previous update (current distance over
/// previous distance), so applying each delivered scale multiplicatively
/// reproduces the total zoom. `velocity` is the distance change per
/// millisecond since the previous update.
#[derive(Debug, Clone)]
pub struct PinchGesture {
    delta_threshold: f32,
    scale: f32,
    previous_scale: f32,
    velocity: f32,
    starting_distance: f32,
    previous_distance: f32,
    previous_timestamp: Option<Instant>,
}

impl PinchGesture {
    pub fn new(delta_threshold: f32) -> Self {
        Self {
            delta_threshold,
            scale: 1.0,
            previous_scale: 1.0,
            velocity: 0.0,
            starting_distance: 0.0,
            previous_distance: 0.0,
            previous_timestamp: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

impl Default for PinchGesture {
    fn default() -> Self {
        Self::new(DEFAULT_DELTA_THRESHOLD)
    }
}

impl FromOptions for PinchGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        Ok(Self::new(
            options.delta_threshold.unwrap_or(DEFAULT_DELTA_THRESHOLD),
        ))
    }
}

impl Gesture for PinchGesture {
    fn default_required_touches(&self) -> usize {
        2
    }

    fn did_become_possible(&mut self, ctx: &mut GestureContext<'_>) {
        self.starting_distance = ctx.distance();
        self.previous_distance = self.starting_distance;
        self.previous_timestamp = ctx.touches().timestamp();
        self.scale = 1.0;
        self.previous_scale = 1.0;
        self.velocity = 0.0;
    }

    fn should_begin(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        (ctx.distance() - self.starting_distance).abs() >= self.delta_threshold
    }

    fn did_change(&mut self, ctx: &mut GestureContext<'_>) {
        let current = ctx.distance();
        let timestamp = ctx.touches().timestamp();

        let elapsed_ms = match (timestamp, self.previous_timestamp) {
            (Some(now), Some(previous)) => now.saturating_duration_since(previous).as_secs_f32() * 1000.0,
            _ => 0.0,
        };
        self.velocity = if elapsed_ms > 0.0 {
            (current - self.previous_distance) / elapsed_ms
        } else {
            0.0
        };

        self.previous_scale = self.scale;
        if self.previous_distance > 0.0 {
            self.scale = current / self.previous_distance;
        }

        self.previous_timestamp = timestamp;
        self.previous_distance = current;
    }

    fn event_was_rejected(&mut self) {
        self.scale = self.previous_scale;
    }

    fn detail(&self) -> GestureDetail {
        GestureDetail::Pinch {
            scale: self.scale,
            velocity: self.velocity,
        }
    }
}
