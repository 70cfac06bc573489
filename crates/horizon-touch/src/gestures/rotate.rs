//! Rotate: two touches turning around each other.

use crate::error::Result;
use crate::options::GestureOptions;
use crate::recognizer::{Gesture, GestureContext, GestureDetail};
use crate::registry::FromOptions;

/// Continuous two-touch gesture publishing rotation in radians.
///
/// Not part of the default registry; register it explicitly:
///
/// ```
/// use horizon_touch::{GestureApplication, RotateGesture};
///
/// let app = GestureApplication::new();
/// app.register_gesture_type::<RotateGesture>("rotate").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RotateGesture {
    start_angle: f32,
    angle: f32,
    previous_angle: f32,
    rotation: f32,
    delta: f32,
    previous_delta: f32,
}

impl RotateGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation since the gesture began.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation since the previous update.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.to_degrees()
    }

    pub fn delta_degrees(&self) -> f32 {
        self.delta.to_degrees()
    }

    fn angle_between_touches(ctx: &GestureContext<'_>) -> f32 {
        match ctx.touches().touches() {
            [first, second, ..] => first.position.angle_to(second.position),
            _ => 0.0,
        }
    }

    fn update_angles(&mut self, angle: f32) {
        self.previous_angle = self.angle;
        self.previous_delta = self.delta;
        self.rotation = self.start_angle - angle;
        self.delta = self.angle - angle;
        self.angle = angle;
    }
}

impl FromOptions for RotateGesture {
    fn from_options(_options: &GestureOptions) -> Result<Self> {
        Ok(Self::new())
    }
}

impl Gesture for RotateGesture {
    fn default_required_touches(&self) -> usize {
        2
    }

    fn did_become_possible(&mut self, ctx: &mut GestureContext<'_>) {
        let angle = Self::angle_between_touches(ctx);
        self.start_angle = angle;
        self.angle = angle;
        self.previous_angle = angle;
        self.previous_delta = 0.0;
        self.delta = 0.0;
        self.update_angles(angle);
    }

    fn did_change(&mut self, ctx: &mut GestureContext<'_>) {
        let angle = Self::angle_between_touches(ctx);
        self.update_angles(angle);
    }

    fn event_was_rejected(&mut self) {
        let previous_delta = self.previous_delta;
        self.update_angles(self.previous_angle);
        self.delta = previous_delta;
    }

    fn detail(&self) -> GestureDetail {
        GestureDetail::Rotate {
            rotation: self.rotation,
            delta: self.delta,
        }
    }
}
