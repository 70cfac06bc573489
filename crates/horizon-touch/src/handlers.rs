//! Explicit handler tables.
//!
//! A view declares which gesture events and raw touch phases it handles by
//! filling a [`ViewHandlers`] table. Recognizers are only created for
//! gestures the table names.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::recognizer::{GestureEvent, GestureEventKind};
use crate::touch::{TouchEvent, TouchPhase};

/// Handles a gesture event. Returning `false` rejects it.
pub type GestureHandler = Arc<dyn Fn(&GestureEvent) -> bool + Send + Sync>;

/// Handles a raw touch event delivered to the view itself.
pub type TouchHandler = Arc<dyn Fn(&TouchEvent) + Send + Sync>;

#[derive(Clone, Default)]
struct GestureHandlerSet {
    start: Option<GestureHandler>,
    change: Option<GestureHandler>,
    end: Option<GestureHandler>,
    cancel: Option<GestureHandler>,
}

impl GestureHandlerSet {
    fn slot(&mut self, kind: GestureEventKind) -> &mut Option<GestureHandler> {
        match kind {
            GestureEventKind::Start => &mut self.start,
            GestureEventKind::Change => &mut self.change,
            GestureEventKind::End => &mut self.end,
            GestureEventKind::Cancel => &mut self.cancel,
        }
    }

    fn get(&self, kind: GestureEventKind) -> Option<&GestureHandler> {
        match kind {
            GestureEventKind::Start => self.start.as_ref(),
            GestureEventKind::Change => self.change.as_ref(),
            GestureEventKind::End => self.end.as_ref(),
            GestureEventKind::Cancel => self.cancel.as_ref(),
        }
    }
}

/// Gesture and raw touch handlers of one view.
#[derive(Clone, Default)]
pub struct ViewHandlers {
    gestures: HashMap<String, GestureHandlerSet>,
    touches: HashMap<TouchPhase, TouchHandler>,
}

impl ViewHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style gesture handler registration.
    pub fn on<F>(mut self, gesture: impl Into<String>, kind: GestureEventKind, handler: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        self.set_gesture_handler(gesture, kind, Arc::new(handler));
        self
    }

    pub fn on_start<F>(self, gesture: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        self.on(gesture, GestureEventKind::Start, handler)
    }

    pub fn on_change<F>(self, gesture: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        self.on(gesture, GestureEventKind::Change, handler)
    }

    pub fn on_end<F>(self, gesture: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        self.on(gesture, GestureEventKind::End, handler)
    }

    pub fn on_cancel<F>(self, gesture: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&GestureEvent) -> bool + Send + Sync + 'static,
    {
        self.on(gesture, GestureEventKind::Cancel, handler)
    }

    /// Builder-style raw touch handler registration.
    pub fn on_touch<F>(mut self, phase: TouchPhase, handler: F) -> Self
    where
        F: Fn(&TouchEvent) + Send + Sync + 'static,
    {
        self.touches.insert(phase, Arc::new(handler));
        self
    }

    pub fn set_gesture_handler(
        &mut self,
        gesture: impl Into<String>,
        kind: GestureEventKind,
        handler: GestureHandler,
    ) {
        *self.gestures.entry(gesture.into()).or_default().slot(kind) = Some(handler);
    }

    pub fn gesture_handler(&self, gesture: &str, kind: GestureEventKind) -> Option<&GestureHandler> {
        self.gestures.get(gesture)?.get(kind)
    }

    pub fn touch_handler(&self, phase: TouchPhase) -> Option<&TouchHandler> {
        self.touches.get(&phase)
    }

    /// Whether the view handles `gesture`'s Start, Change or End event.
    pub fn wants_gesture(&self, gesture: &str) -> bool {
        self.gestures.get(gesture).is_some_and(|set| {
            set.start.is_some() || set.change.is_some() || set.end.is_some()
        })
    }
}

impl fmt::Debug for ViewHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut gestures: Vec<_> = self.gestures.keys().collect();
        gestures.sort();
        let mut phases: Vec<_> = self.touches.keys().map(|p| p.handler_name()).collect();
        phases.sort_unstable();
        f.debug_struct("ViewHandlers")
            .field("gestures", &gestures)
            .field("touches", &phases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_gesture_ignores_cancel_only() {
        let handlers = ViewHandlers::new()
            .on_cancel("pan", |_| true)
            .on_end("tap", |_| true);
        assert!(!handlers.wants_gesture("pan"));
        assert!(handlers.wants_gesture("tap"));
        assert!(!handlers.wants_gesture("pinch"));
    }

    #[test]
    fn test_lookup_by_kind() {
        let handlers = ViewHandlers::new()
            .on_start("pan", |_| true)
            .on_change("pan", |_| false);
        assert!(handlers.gesture_handler("pan", GestureEventKind::Start).is_some());
        assert!(handlers.gesture_handler("pan", GestureEventKind::Change).is_some());
        assert!(handlers.gesture_handler("pan", GestureEventKind::End).is_none());
        assert!(handlers.gesture_handler("swipe", GestureEventKind::End).is_none());
    }

    #[test]
    fn test_touch_handlers() {
        let handlers = ViewHandlers::new().on_touch(TouchPhase::Start, |_| {});
        assert!(handlers.touch_handler(TouchPhase::Start).is_some());
        assert!(handlers.touch_handler(TouchPhase::End).is_none());
    }
}
