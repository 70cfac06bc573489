//! Per-view gesture dispatch.

use horizon_touch_core::logging::targets;

use crate::application::GestureApplication;
use crate::delegate;
use crate::recognizer::Recognizer;
use crate::touch::TouchEvent;
use crate::view::ViewId;

/// The recognizers of one view, in registration order.
///
/// A manager only offers touches to its own recognizers; the direct view
/// handler and bubbling to the parent are driven by the
/// [`ViewTree`](crate::ViewTree).
#[derive(Debug)]
pub struct GestureManager {
    view: ViewId,
    recognizers: Vec<Recognizer>,
}

impl GestureManager {
    pub fn new(view: ViewId, recognizers: Vec<Recognizer>) -> Self {
        Self { view, recognizers }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn recognizers(&self) -> &[Recognizer] {
        &self.recognizers
    }

    pub fn recognizer(&self, name: &str) -> Option<&Recognizer> {
        self.recognizers.iter().find(|r| r.name() == name)
    }

    pub fn recognizer_mut(&mut self, name: &str) -> Option<&mut Recognizer> {
        self.recognizers.iter_mut().find(|r| r.name() == name)
    }

    pub(crate) fn recognizer_at_mut(&mut self, slot: usize) -> Option<&mut Recognizer> {
        self.recognizers.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Offer `event` to every admitted recognizer. Returns how many received it.
    ///
    /// While exclusivity is held elsewhere and this view fails the holder's
    /// predicate, no recognizer sees the event.
    pub fn dispatch(&mut self, app: &GestureApplication, event: &TouchEvent) -> usize {
        if !app.should_receive_touch(self.view) {
            tracing::debug!(target: targets::MANAGER, view = ?self.view, holder = ?app.blocker(), "view blocked by exclusivity");
            return 0;
        }

        let mut received = 0;
        for recognizer in &mut self.recognizers {
            if !recognizer.is_enabled() {
                tracing::trace!(target: targets::MANAGER, gesture = recognizer.name(), "recognizer disabled");
                continue;
            }

            let admitted = match recognizer.delegate().cloned() {
                Some(d) => delegate::admits(d.as_ref(), recognizer, self.view, event),
                None => true,
            };
            if !admitted {
                tracing::trace!(target: targets::MANAGER, gesture = recognizer.name(), "delegate refused touch");
                continue;
            }

            recognizer.handle(app, event);
            received += 1;
        }
        received
    }

    /// Stop every timer owned by this manager's recognizers.
    pub(crate) fn stop_timers(&self, app: &GestureApplication) {
        for recognizer in &self.recognizers {
            app.stop_timers_for(recognizer.owner());
        }
    }
}
