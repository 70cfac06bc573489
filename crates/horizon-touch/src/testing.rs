//! Single-view test fixture shared by the gesture unit tests.

use std::sync::Arc;

use horizon_touch_core::ManualClock;
use parking_lot::Mutex;

use crate::application::GestureApplication;
use crate::gestures::{ROTATE, RotateGesture};
use crate::handlers::ViewHandlers;
use crate::options::{GestureConfig, GestureOptions};
use crate::recognizer::{GestureEvent, GestureEventKind, GestureState, Recognizer};
use crate::touch::{TouchEvent, TouchId, TouchPoint};
use crate::view::{ViewId, ViewTree};

/// One view with a single gesture and recording handlers for all four kinds.
pub(crate) struct Harness {
    pub clock: Arc<ManualClock>,
    pub tree: ViewTree,
    pub view: ViewId,
    gesture: String,
    events: Arc<Mutex<Vec<GestureEvent>>>,
}

impl Harness {
    pub fn new(gesture: &str, options: GestureOptions) -> Self {
        Self::with_handler(gesture, options, |_| true)
    }

    /// Like [`Harness::new`], with `accept` deciding each delivery.
    pub fn with_handler<F>(gesture: &str, options: GestureOptions, accept: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let clock = Arc::new(ManualClock::new());
        let app = Arc::new(GestureApplication::with_clock(clock.clone()));
        if gesture == ROTATE {
            app.register_gesture_type::<RotateGesture>(ROTATE).unwrap();
        }

        let events = Arc::new(Mutex::new(Vec::new()));
        let accept = Arc::new(accept);
        let mut handlers = ViewHandlers::new();
        for kind in [
            GestureEventKind::Start,
            GestureEventKind::Change,
            GestureEventKind::End,
            GestureEventKind::Cancel,
        ] {
            let events = events.clone();
            let accept = accept.clone();
            handlers.set_gesture_handler(
                gesture,
                kind,
                Arc::new(move |event: &GestureEvent| {
                    events.lock().push(event.clone());
                    accept(event)
                }),
            );
        }

        let mut tree = ViewTree::new(app);
        let view = tree
            .add_view(None, handlers, GestureConfig::new().with(gesture, options))
            .unwrap();
        tree.prepare(view).unwrap();

        Self {
            clock,
            tree,
            view,
            gesture: gesture.to_string(),
            events,
        }
    }

    pub fn start(&mut self, touches: &[(TouchId, f32, f32)]) {
        self.tree.dispatch(self.view, &TouchEvent::start(points(touches))).unwrap();
    }

    pub fn move_to(&mut self, touches: &[(TouchId, f32, f32)]) {
        self.tree.dispatch(self.view, &TouchEvent::moved(points(touches))).unwrap();
    }

    pub fn end(&mut self, touches: &[(TouchId, f32, f32)]) {
        self.tree.dispatch(self.view, &TouchEvent::end(points(touches))).unwrap();
    }

    pub fn cancel(&mut self) {
        self.tree.dispatch(self.view, &TouchEvent::cancel(Vec::new())).unwrap();
    }

    /// Advance the clock and fire due timers.
    pub fn advance(&mut self, ms: u64) -> usize {
        self.clock.advance_ms(ms);
        self.tree.process_timers()
    }

    pub fn recognizer(&self) -> &Recognizer {
        self.tree.recognizer(self.view, &self.gesture).unwrap()
    }

    pub fn state(&self) -> GestureState {
        self.recognizer().state()
    }

    pub fn events(&self) -> Vec<GestureEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<GestureEventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    /// Timers currently armed for the recognizer.
    pub fn live_timers(&self) -> usize {
        self.tree.app().live_timers_for(self.recognizer().owner())
    }
}

pub(crate) fn points(touches: &[(TouchId, f32, f32)]) -> Vec<TouchPoint> {
    touches
        .iter()
        .map(|&(id, x, y)| TouchPoint::new(id, x, y))
        .collect()
}
