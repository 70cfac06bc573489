//! Pan: the touch center moving along an enabled axis.

use horizon_touch_core::Point;

use super::PanDirection;
use crate::error::Result;
use crate::options::GestureOptions;
use crate::recognizer::{Gesture, GestureContext, GestureDetail};
use crate::registry::FromOptions;

const DEFAULT_INIT_THRESHOLD: f32 = 5.0;

/// Continuous gesture publishing incremental translation of the touch center.
///
/// The translation is the movement since the previous update, not since the
/// gesture began; views apply it as a relative offset.
#[derive(Debug, Clone)]
pub struct PanGesture {
    direction: PanDirection,
    init_threshold: f32,
    translation: Point,
    previous_translation: Point,
    previous_location: Point,
}

impl PanGesture {
    pub fn new(direction: PanDirection, init_threshold: f32) -> Self {
        Self {
            direction,
            init_threshold,
            translation: Point::ZERO,
            previous_translation: Point::ZERO,
            previous_location: Point::ZERO,
        }
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn direction(&self) -> PanDirection {
        self.direction
    }
}

impl Default for PanGesture {
    fn default() -> Self {
        Self::new(PanDirection::default(), DEFAULT_INIT_THRESHOLD)
    }
}

impl FromOptions for PanGesture {
    fn from_options(options: &GestureOptions) -> Result<Self> {
        Ok(Self::new(
            options
                .direction
                .map(PanDirection::from_bits)
                .unwrap_or_default(),
            options.init_threshold.unwrap_or(DEFAULT_INIT_THRESHOLD),
        ))
    }
}

impl Gesture for PanGesture {
    fn did_become_possible(&mut self, ctx: &mut GestureContext<'_>) {
        self.previous_location = ctx.center();
    }

    fn should_begin(&mut self, ctx: &mut GestureContext<'_>) -> bool {
        let current = ctx.center();
        let previous = self.previous_location;

        let vertical = self.direction.contains(PanDirection::VERTICAL)
            && (previous.y - current.y).abs() >= self.init_threshold;
        vertical
            || (self.direction.contains(PanDirection::HORIZONTAL)
                && (previous.x - current.x).abs() >= self.init_threshold)
    }

    fn did_change(&mut self, ctx: &mut GestureContext<'_>) {
        let current = ctx.center();
        self.previous_translation = self.translation;
        self.translation = current - self.previous_location;
        self.previous_location = current;
    }

    fn event_was_rejected(&mut self) {
        self.translation = self.previous_translation;
    }

    fn detail(&self) -> GestureDetail {
        GestureDetail::Pan {
            translation: self.translation,
        }
    }
}
