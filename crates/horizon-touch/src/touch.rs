//! Touch points, raw touch events and the per-recognizer touch set.

use std::time::Instant;

use horizon_touch_core::Point;

use crate::view::ViewId;

/// Identifier of a physical contact, stable from touch-down until lift.
pub type TouchId = u64;

/// A single tracked contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Contact identifier.
    pub id: TouchId,
    /// Latest position.
    pub position: Point,
    /// The view the contact originated on, if known.
    pub target: Option<ViewId>,
}

impl TouchPoint {
    /// Create a touch point without a target.
    pub fn new(id: TouchId, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            target: None,
        }
    }

    /// Create a touch point at `position`.
    pub fn at(id: TouchId, position: Point) -> Self {
        Self {
            id,
            position,
            target: None,
        }
    }

    /// Set the originating view.
    pub fn with_target(mut self, target: ViewId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Phase of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// One or more contacts went down.
    Start,
    /// One or more contacts moved.
    Move,
    /// One or more contacts lifted.
    End,
    /// The platform cancelled the contacts.
    Cancel,
}

impl TouchPhase {
    /// The handler-style name of the phase (`touchStart`, ...).
    pub fn handler_name(self) -> &'static str {
        match self {
            Self::Start => "touchStart",
            Self::Move => "touchMove",
            Self::End => "touchEnd",
            Self::Cancel => "touchCancel",
        }
    }
}

/// A raw touch event as delivered by the host.
///
/// For [`TouchPhase::Start`] the touches are the new contacts; for the
/// other phases they are the contacts that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new event.
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// A touch-start event.
    pub fn start(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchPhase::Start, touches)
    }

    /// A touch-move event.
    pub fn moved(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchPhase::Move, touches)
    }

    /// A touch-end event.
    pub fn end(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchPhase::End, touches)
    }

    /// A touch-cancel event.
    pub fn cancel(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchPhase::Cancel, touches)
    }
}

/// The active touches of one recognizer, unique by identifier, in arrival order.
///
/// Also records when it was last mutated, which recognizers use for
/// velocities and hold periods.
#[derive(Debug, Clone, Default)]
pub struct TouchSet {
    touches: Vec<TouchPoint>,
    timestamp: Option<Instant>,
}

impl TouchSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked touches.
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    /// Whether no touches are tracked.
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Whether a touch with `id` is tracked.
    pub fn contains(&self, id: TouchId) -> bool {
        self.get(id).is_some()
    }

    /// The tracked touch with `id`.
    pub fn get(&self, id: TouchId) -> Option<&TouchPoint> {
        self.touches.iter().find(|t| t.id == id)
    }

    /// Track a new touch. Returns `false` if the identifier is already present.
    pub fn add(&mut self, touch: TouchPoint) -> bool {
        if self.contains(touch.id) {
            return false;
        }
        self.touches.push(touch);
        true
    }

    /// Replace the tracked touch with the same identifier.
    ///
    /// Returns `false` for untracked identifiers, which are ignored.
    pub fn update(&mut self, touch: TouchPoint) -> bool {
        match self.touches.iter_mut().find(|t| t.id == touch.id) {
            Some(slot) => {
                *slot = touch;
                true
            }
            None => false,
        }
    }

    /// Stop tracking a touch.
    pub fn remove(&mut self, id: TouchId) -> Option<TouchPoint> {
        let index = self.touches.iter().position(|t| t.id == id)?;
        Some(self.touches.remove(index))
    }

    /// Drop every tracked touch. The timestamp is kept.
    pub fn clear(&mut self) {
        self.touches.clear();
    }

    /// The tracked touches in arrival order.
    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }

    /// Iterate over the tracked touches.
    pub fn iter(&self) -> std::slice::Iter<'_, TouchPoint> {
        self.touches.iter()
    }

    /// When the set was last mutated.
    pub fn timestamp(&self) -> Option<Instant> {
        self.timestamp
    }

    /// Record a mutation time.
    pub fn set_timestamp(&mut self, now: Instant) {
        self.timestamp = Some(now);
    }

    /// Mean position of all tracked touches.
    pub fn center(&self) -> Point {
        center_point(&self.touches)
    }

    /// Distance between the first two tracked touches.
    pub fn distance(&self) -> f32 {
        distance(&self.touches)
    }
}

impl<'a> IntoIterator for &'a TouchSet {
    type Item = &'a TouchPoint;
    type IntoIter = std::slice::Iter<'a, TouchPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Euclidean distance between the first two touches, or 0 with fewer than two.
pub fn distance(touches: &[TouchPoint]) -> f32 {
    match touches {
        [first, second, ..] => first.position.distance_to(second.position),
        _ => 0.0,
    }
}

/// Arithmetic mean of the touch positions, or the origin for an empty list.
pub fn center_point(touches: &[TouchPoint]) -> Point {
    if touches.is_empty() {
        return Point::ZERO;
    }
    let sum = touches
        .iter()
        .fold(Point::ZERO, |acc, t| acc + t.position);
    let n = touches.len() as f32;
    Point::new(sum.x / n, sum.y / n)
}
