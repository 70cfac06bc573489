//! Conversion from winit touch events.
//!
//! winit reports one contact per event. [`TouchInputHandler`] converts each
//! into a [`TouchEvent`] and remembers which view a contact started on, so
//! later moves and lifts of the same contact are routed to that view even
//! when they leave its bounds.
//!
//! ```ignore
//! use horizon_touch::{TouchInputHandler, ViewTree};
//!
//! let mut input = TouchInputHandler::new();
//!
//! // In the winit event loop, with `hit` the view under the contact:
//! input.dispatch(&mut tree, &touch, hit)?;
//! ```

use std::collections::HashMap;

use horizon_touch_core::Point;
use horizon_touch_core::logging::targets;
use winit::event::{Touch, TouchPhase as WinitTouchPhase};

use crate::error::Result;
use crate::touch::{TouchEvent, TouchId, TouchPhase, TouchPoint};
use crate::view::{ViewId, ViewTree};

/// Converts a winit touch phase.
pub fn from_winit_touch_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Start,
        WinitTouchPhase::Moved => TouchPhase::Move,
        WinitTouchPhase::Ended => TouchPhase::End,
        WinitTouchPhase::Cancelled => TouchPhase::Cancel,
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveContact {
    position: Point,
    target: Option<ViewId>,
}

/// Tracks active contacts across winit touch events.
#[derive(Debug, Default)]
pub struct TouchInputHandler {
    active: HashMap<TouchId, ActiveContact>,
}

impl TouchInputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn position_of(&self, id: TouchId) -> Option<Point> {
        self.active.get(&id).map(|c| c.position)
    }

    /// The view a contact started on.
    pub fn target_of(&self, id: TouchId) -> Option<ViewId> {
        self.active.get(&id).and_then(|c| c.target)
    }

    /// Convert a winit touch.
    ///
    /// `hit` is only consulted when the contact starts; afterwards the
    /// contact keeps the target it started with.
    pub fn handle_touch(&mut self, touch: &Touch, hit: Option<ViewId>) -> TouchEvent {
        let phase = from_winit_touch_phase(touch.phase);
        let position = Point::new(touch.location.x as f32, touch.location.y as f32);

        let target = match phase {
            TouchPhase::Start => {
                self.active.insert(touch.id, ActiveContact { position, target: hit });
                hit
            }
            TouchPhase::Move => match self.active.get_mut(&touch.id) {
                Some(contact) => {
                    contact.position = position;
                    contact.target
                }
                None => {
                    tracing::trace!(target: targets::TOUCH, id = touch.id, "move for unknown contact");
                    None
                }
            },
            TouchPhase::End | TouchPhase::Cancel => {
                self.active.remove(&touch.id).and_then(|c| c.target)
            }
        };

        let mut point = TouchPoint::at(touch.id, position);
        point.target = target;
        TouchEvent::new(phase, vec![point])
    }

    /// Convert a winit touch and dispatch it to its view, if it has one.
    ///
    /// Returns whether the event was dispatched.
    pub fn dispatch(&mut self, tree: &mut ViewTree, touch: &Touch, hit: Option<ViewId>) -> Result<bool> {
        let event = self.handle_touch(touch, hit);
        match event.touches.first().and_then(|p| p.target) {
            Some(target) if tree.contains(target) => {
                tree.dispatch(target, &event)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Forget every active contact.
    pub fn reset(&mut self) {
        self.active.clear();
    }
}
