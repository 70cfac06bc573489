//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_touch::{
    GestureApplication, GestureEvent, GestureEventKind, ManualClock, TouchEvent, TouchPoint,
    ViewHandlers, ViewId, ViewTree,
};
use parking_lot::Mutex;

/// Collects every gesture event delivered to the handlers it installed.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<GestureEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install accepting handlers for all four event kinds of `gesture`.
    pub fn handle(&self, handlers: ViewHandlers, gesture: &str) -> ViewHandlers {
        let mut handlers = handlers;
        for kind in [
            GestureEventKind::Start,
            GestureEventKind::Change,
            GestureEventKind::End,
            GestureEventKind::Cancel,
        ] {
            let events = self.events.clone();
            handlers.set_gesture_handler(
                gesture,
                kind,
                Arc::new(move |event: &GestureEvent| {
                    events.lock().push(event.clone());
                    true
                }),
            );
        }
        handlers
    }

    pub fn events(&self) -> Vec<GestureEvent> {
        self.events.lock().clone()
    }

    /// Handler-style names, e.g. `panStart`.
    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(GestureEvent::handler_name).collect()
    }

    /// Handler-style names of events delivered to `view`.
    pub fn names_for(&self, view: ViewId) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.view == view)
            .map(GestureEvent::handler_name)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// A tree over a fresh context driven by a manual clock.
pub fn tree() -> (Arc<ManualClock>, ViewTree) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let clock = Arc::new(ManualClock::new());
    let app = Arc::new(GestureApplication::with_clock(clock.clone()));
    (clock, ViewTree::new(app))
}

pub fn touches(points: &[(u64, f32, f32)]) -> Vec<TouchPoint> {
    points
        .iter()
        .map(|&(id, x, y)| TouchPoint::new(id, x, y))
        .collect()
}

pub fn start(tree: &mut ViewTree, view: ViewId, points: &[(u64, f32, f32)]) {
    tree.dispatch(view, &TouchEvent::start(touches(points))).unwrap();
}

pub fn move_to(tree: &mut ViewTree, view: ViewId, points: &[(u64, f32, f32)]) {
    tree.dispatch(view, &TouchEvent::moved(touches(points))).unwrap();
}

pub fn end(tree: &mut ViewTree, view: ViewId, points: &[(u64, f32, f32)]) {
    tree.dispatch(view, &TouchEvent::end(touches(points))).unwrap();
}
