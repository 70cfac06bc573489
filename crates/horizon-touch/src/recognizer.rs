//! The gesture recognizer state machine.
//!
//! A [`Recognizer`] owns all phase-transition logic for one gesture bound to
//! one view. What distinguishes a pan from a pinch lives behind the
//! [`Gesture`] capability trait: the engine calls its hooks at fixed points
//! of the touch lifecycle and applies whatever the hook requested through the
//! [`GestureContext`] (state changes, timers, event deliveries) once the hook
//! returns.
//!
//! # Lifecycle
//!
//! ```text
//! touch start ──► WaitingForTouches ──(enough touches)──► Possible ──(should_begin)──► Began
//!                                    └─(discrete, should_begin)──────────────────────► Began
//! Began/Changed ──(move)──► Changed ──(end, should_end)──► Ended
//!                                    └─(end, !should_end)─► Cancelled (silent)
//! Possible ──(end)──► WaitingForTouches
//! any ──(cancel)──► Cancelled
//! ```
//!
//! A gesture that asks to keep waiting on lift (multi-tap) also sits in
//! `Cancelled`, but keeps its timer and its own progress until the next
//! touch start begins it again.
//!
//! Continuous gestures deliver `Start`, `Change`, `End` and `Cancel` events to
//! the view; discrete gestures only deliver `End`, plus whatever their own
//! hooks deliver from timers.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_touch_core::logging::targets;
use horizon_touch_core::{Point, TimerId};

use crate::application::GestureApplication;
use crate::binding::Enablement;
use crate::delegate::GestureDelegate;
use crate::gestures::SwipeDirection;
use crate::handlers::ViewHandlers;
use crate::touch::{TouchEvent, TouchPhase, TouchPoint, TouchSet};
use crate::view::{TreeId, ViewId};

/// Phase of a recognizer within the current contact sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// Fewer touches than required are down.
    #[default]
    WaitingForTouches,
    /// Enough touches are down; a continuous gesture is waiting for `should_begin`.
    Possible,
    /// The gesture was recognized.
    Began,
    /// The gesture was updated after beginning.
    Changed,
    /// The gesture completed.
    Ended,
    /// The gesture was abandoned.
    Cancelled,
}

impl GestureState {
    /// Whether the gesture is currently recognized (began or changed).
    pub fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }

    /// Whether the contact sequence is over for this recognizer.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// The kind of event delivered to a view's gesture handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEventKind {
    Start,
    Change,
    End,
    Cancel,
}

impl GestureEventKind {
    /// Suffix appended to the gesture name to form the handler name.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Change => "Change",
            Self::End => "End",
            Self::Cancel => "Cancel",
        }
    }
}

/// Marker carried by events synthesized from a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutKind {
    Cancel,
    End,
}

/// What triggered a gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// A real touch event of the given phase.
    Touch(TouchPhase),
    /// A timer armed by the recognizer expired.
    Timeout(TimeoutKind),
}

impl EventSource {
    /// Whether the event was synthesized by a timer.
    pub fn is_timeout(self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Gesture-specific values published with each event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureDetail {
    /// The gesture publishes no derived values.
    #[default]
    None,
    /// Incremental movement of the touch center since the previous update.
    Pan { translation: Point },
    /// Ratio of the current touch distance to the previous one.
    Pinch { scale: f32, velocity: f32 },
    /// Rotation in radians, cumulative since begin and since the previous update.
    Rotate { rotation: f32, delta: f32 },
    /// Direction recognized when the swipe ended.
    Swipe { direction: Option<SwipeDirection> },
    /// Number of taps counted in the current sequence.
    Tap { taps: u32 },
}

impl GestureDetail {
    /// Cumulative rotation in degrees, for rotate details.
    pub fn rotation_degrees(&self) -> Option<f32> {
        match self {
            Self::Rotate { rotation, .. } => Some(rotation.to_degrees()),
            _ => None,
        }
    }

    /// Per-update rotation in degrees, for rotate details.
    pub fn delta_degrees(&self) -> Option<f32> {
        match self {
            Self::Rotate { delta, .. } => Some(delta.to_degrees()),
            _ => None,
        }
    }
}

/// An event delivered to a view's gesture handler.
#[derive(Debug, Clone)]
pub struct GestureEvent {
    /// Registered gesture name (`pan`, `pinch`, ...).
    pub gesture: String,
    pub kind: GestureEventKind,
    /// The view the recognizer is bound to.
    pub view: ViewId,
    /// Recognizer state at delivery time.
    pub state: GestureState,
    pub detail: GestureDetail,
    /// Snapshot of the recognizer's touches.
    pub touches: Vec<TouchPoint>,
    pub source: EventSource,
}

impl GestureEvent {
    /// Handler-style name, e.g. `pinchChange`.
    pub fn handler_name(&self) -> String {
        format!("{}{}", self.gesture, self.kind.suffix())
    }
}

/// Identifies a recognizer across view trees, used as the timer owner tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecognizerRef {
    pub tree: TreeId,
    pub view: ViewId,
    /// Index in the view's recognizer list.
    pub slot: usize,
}

/// Per-gesture policy plugged into the recognizer engine.
///
/// Every hook has a permissive default, so a gesture only overrides the
/// points where its geometry matters. Hooks never touch the engine directly;
/// they read touches and request effects through the [`GestureContext`].
pub trait Gesture: Send + fmt::Debug {
    /// Discrete gestures begin as soon as enough touches are down and only
    /// deliver `End`.
    fn is_discrete(&self) -> bool {
        false
    }

    /// Touch count used when the options don't specify one.
    fn default_required_touches(&self) -> usize {
        1
    }

    /// Enough touches are down; continuous gestures initialize here.
    fn did_become_possible(&mut self, _ctx: &mut GestureContext<'_>) {}

    /// Whether the gesture may enter `Began`.
    fn should_begin(&mut self, _ctx: &mut GestureContext<'_>) -> bool {
        true
    }

    fn did_begin(&mut self, _ctx: &mut GestureContext<'_>) {}

    /// Touches moved while began or changed. Derived values are updated here.
    fn did_change(&mut self, _ctx: &mut GestureContext<'_>) {}

    /// Whether a lift completes the gesture. Returning `false` cancels silently.
    fn should_end(&mut self, _ctx: &mut GestureContext<'_>) -> bool {
        true
    }

    fn did_end(&mut self, _ctx: &mut GestureContext<'_>) {}

    fn did_cancel(&mut self, _ctx: &mut GestureContext<'_>) {}

    /// The view returned `false` from a handler; restore the values that were
    /// current before the rejected delivery.
    fn event_was_rejected(&mut self) {}

    /// The timer armed through [`GestureContext::arm_timer`] expired.
    fn timer_fired(&mut self, _ctx: &mut GestureContext<'_>) {}

    /// Values published with each delivered event.
    fn detail(&self) -> GestureDetail {
        GestureDetail::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerRequest {
    Keep,
    Arm(Duration),
    Disarm,
}

/// Hook-side view of the recognizer.
///
/// Requests made here are applied by the engine after the hook returns, in
/// this order: state change, timer change, deliveries, touch reset.
#[derive(Debug)]
pub struct GestureContext<'a> {
    touches: &'a TouchSet,
    state: GestureState,
    now: Instant,
    source: EventSource,
    timer: TimerRequest,
    deliveries: Vec<GestureEventKind>,
    reset_touches: bool,
    keep_waiting: bool,
}

impl<'a> GestureContext<'a> {
    fn new(touches: &'a TouchSet, state: GestureState, now: Instant, source: EventSource) -> Self {
        Self {
            touches,
            state,
            now,
            source,
            timer: TimerRequest::Keep,
            deliveries: Vec::new(),
            reset_touches: false,
            keep_waiting: false,
        }
    }

    /// The recognizer's tracked touches.
    pub fn touches(&self) -> &TouchSet {
        self.touches
    }

    /// Mean position of the tracked touches.
    pub fn center(&self) -> Point {
        self.touches.center()
    }

    /// Distance between the first two tracked touches.
    pub fn distance(&self) -> f32 {
        self.touches.distance()
    }

    /// Current recognizer state, including changes requested by this hook.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Force a state transition.
    pub fn set_state(&mut self, state: GestureState) {
        self.state = state;
    }

    /// Time of the event being processed.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// What triggered this hook.
    pub fn source(&self) -> EventSource {
        self.source
    }

    /// Arm the recognizer's timer, replacing any pending one.
    pub fn arm_timer(&mut self, after: Duration) {
        self.timer = TimerRequest::Arm(after);
    }

    /// Disarm the recognizer's timer, if any.
    pub fn disarm_timer(&mut self) {
        self.timer = TimerRequest::Disarm;
    }

    /// Deliver an event to the view. Events delivered from a timer hook carry
    /// a timeout source.
    pub fn deliver(&mut self, kind: GestureEventKind) {
        self.deliveries.push(kind);
    }

    /// Clear the tracked touches once the hook's deliveries are flushed.
    pub fn reset_touches(&mut self) {
        self.reset_touches = true;
    }

    /// From `should_end`: more touches are expected. The recognizer parks in
    /// `Cancelled` without running `did_cancel` or delivering anything, and
    /// any armed timer stays armed.
    pub fn keep_waiting(&mut self) {
        self.keep_waiting = true;
    }

    fn into_effects(self) -> Effects {
        Effects {
            state: self.state,
            timer: self.timer,
            deliveries: self.deliveries,
            source: self.source,
            reset_touches: self.reset_touches,
            keep_waiting: self.keep_waiting,
        }
    }
}

struct Effects {
    state: GestureState,
    timer: TimerRequest,
    deliveries: Vec<GestureEventKind>,
    source: EventSource,
    reset_touches: bool,
    keep_waiting: bool,
}

/// Construction-time settings shared by every gesture type.
#[derive(Debug)]
pub struct RecognizerConfig {
    pub required_touches: usize,
    pub simultaneously: bool,
    pub enabled: Enablement,
    pub delegate: Option<Arc<dyn GestureDelegate>>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            required_touches: 1,
            simultaneously: true,
            enabled: Enablement::Fixed(true),
            delegate: None,
        }
    }
}

/// One gesture state machine bound to one view.
pub struct Recognizer {
    name: String,
    owner: RecognizerRef,
    gesture: Box<dyn Gesture>,
    touches: TouchSet,
    state: GestureState,
    required_touches: usize,
    simultaneously: bool,
    enabled: Enablement,
    delegate: Option<Arc<dyn GestureDelegate>>,
    handlers: Arc<ViewHandlers>,
    timer: Option<TimerId>,
    keep_waiting: bool,
}

impl Recognizer {
    /// Bind `gesture` to the view and slot given by `owner`.
    pub fn new(
        name: impl Into<String>,
        owner: RecognizerRef,
        gesture: Box<dyn Gesture>,
        config: RecognizerConfig,
        handlers: Arc<ViewHandlers>,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            gesture,
            touches: TouchSet::new(),
            state: GestureState::WaitingForTouches,
            required_touches: config.required_touches.max(1),
            simultaneously: config.simultaneously,
            enabled: config.enabled,
            delegate: config.delegate,
            handlers,
            timer: None,
            keep_waiting: false,
        }
    }

    /// Registered gesture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The view this recognizer is bound to.
    pub fn view(&self) -> ViewId {
        self.owner.view
    }

    /// Timer owner tag of this recognizer.
    pub fn owner(&self) -> RecognizerRef {
        self.owner
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_discrete(&self) -> bool {
        self.gesture.is_discrete()
    }

    pub fn touches(&self) -> &TouchSet {
        &self.touches
    }

    pub fn required_touches(&self) -> usize {
        self.required_touches
    }

    /// Whether this recognizer tolerates other gestures running elsewhere.
    pub fn simultaneously(&self) -> bool {
        self.simultaneously
    }

    /// Current gesture-specific values.
    pub fn detail(&self) -> GestureDetail {
        self.gesture.detail()
    }

    pub fn gesture(&self) -> &dyn Gesture {
        self.gesture.as_ref()
    }

    pub fn delegate(&self) -> Option<&Arc<dyn GestureDelegate>> {
        self.delegate.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.is_enabled()
    }

    /// Override enablement with a fixed value, dropping any live binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = Enablement::Fixed(enabled);
    }

    /// The pending timer, if one is armed.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Route a raw touch event to the matching phase handler.
    pub fn handle(&mut self, app: &GestureApplication, event: &TouchEvent) {
        match event.phase {
            TouchPhase::Start => self.touch_start(app, &event.touches),
            TouchPhase::Move => self.touch_move(app, &event.touches),
            TouchPhase::End => self.touch_end(app, &event.touches),
            TouchPhase::Cancel => self.touch_cancel(app),
        }
    }

    /// New contacts went down.
    #[tracing::instrument(skip_all, target = "horizon_touch::recognizer", level = "trace", fields(gesture = %self.name))]
    pub fn touch_start(&mut self, app: &GestureApplication, new_touches: &[TouchPoint]) {
        self.touches.set_timestamp(app.now());
        for touch in new_touches {
            if self.touches.contains(touch.id) {
                continue;
            }
            if self.touches.len() >= self.required_touches {
                self.touches.clear();
            }
            self.touches.add(*touch);
        }

        if self.touches.len() < self.required_touches {
            self.transition(GestureState::WaitingForTouches);
            return;
        }

        let source = EventSource::Touch(TouchPhase::Start);
        if self.gesture.is_discrete() {
            if self.run(app, source, |g, ctx| g.should_begin(ctx)) && self.acquire_exclusivity(app) {
                self.transition(GestureState::Began);
                self.run(app, source, |g, ctx| g.did_begin(ctx));
            }
        } else {
            self.transition(GestureState::Possible);
            self.run(app, source, |g, ctx| g.did_become_possible(ctx));
        }
    }

    /// Tracked contacts moved.
    #[tracing::instrument(skip_all, target = "horizon_touch::recognizer", level = "trace", fields(gesture = %self.name))]
    pub fn touch_move(&mut self, app: &GestureApplication, moved: &[TouchPoint]) {
        if matches!(
            self.state,
            GestureState::WaitingForTouches | GestureState::Ended | GestureState::Cancelled
        ) {
            return;
        }

        self.touches.set_timestamp(app.now());
        for touch in moved {
            self.touches.update(*touch);
        }

        let source = EventSource::Touch(TouchPhase::Move);
        let discrete = self.gesture.is_discrete();
        match self.state {
            GestureState::Possible if !discrete => {
                if self.touches.len() < self.required_touches {
                    return;
                }
                if !(self.run(app, source, |g, ctx| g.should_begin(ctx))
                    && self.acquire_exclusivity(app))
                {
                    return;
                }
                self.transition(GestureState::Began);
                self.run(app, source, |g, ctx| g.did_begin(ctx));
                if self.state != GestureState::Began {
                    return;
                }
                // Start carries values derived from this move.
                self.run(app, source, |g, ctx| g.did_change(ctx));
                if self.state == GestureState::Began {
                    self.deliver(GestureEventKind::Start, source);
                }
            }
            GestureState::Began | GestureState::Changed => {
                self.transition(GestureState::Changed);
                self.run(app, source, |g, ctx| g.did_change(ctx));
                if self.state == GestureState::Changed && !discrete {
                    self.deliver(GestureEventKind::Change, source);
                }
            }
            _ => {}
        }
    }

    /// Tracked contacts lifted. Always closes the contact sequence, except
    /// when the gesture asked to keep waiting for further touches.
    #[tracing::instrument(skip_all, target = "horizon_touch::recognizer", level = "trace", fields(gesture = %self.name))]
    pub fn touch_end(&mut self, app: &GestureApplication, ended: &[TouchPoint]) {
        self.touches.set_timestamp(app.now());
        for touch in ended {
            self.touches.update(*touch);
        }

        if self.state.is_active() {
            let source = EventSource::Touch(TouchPhase::End);
            let before = self.state;
            self.keep_waiting = false;
            let should_end = self.run(app, source, |g, ctx| g.should_end(ctx));

            if self.keep_waiting {
                self.keep_waiting = false;
                self.transition(GestureState::Cancelled);
                self.touches.clear();
                return;
            }

            // The hook may have settled the outcome itself.
            if self.state == before {
                if should_end {
                    self.transition(GestureState::Ended);
                    self.run(app, source, |g, ctx| g.did_end(ctx));
                    self.deliver(GestureEventKind::End, source);
                } else {
                    self.transition(GestureState::Cancelled);
                    self.run(app, source, |g, ctx| g.did_cancel(ctx));
                }
            }
        }

        self.disarm_timer(app);
        self.touches.clear();
        if self.state == GestureState::Possible {
            self.transition(GestureState::WaitingForTouches);
        }
    }

    /// The platform cancelled the contacts.
    #[tracing::instrument(skip_all, target = "horizon_touch::recognizer", level = "trace", fields(gesture = %self.name))]
    pub fn touch_cancel(&mut self, app: &GestureApplication) {
        // A sequence parked between touches still has progress to drop.
        if self.state != GestureState::Cancelled || self.timer.is_some() {
            let source = EventSource::Touch(TouchPhase::Cancel);
            self.transition(GestureState::Cancelled);
            self.run(app, source, |g, ctx| g.did_cancel(ctx));
            if !self.gesture.is_discrete() {
                self.deliver(GestureEventKind::Cancel, source);
            }
        }
        self.disarm_timer(app);
        self.touches.clear();
    }

    /// Handle an expired timer. Returns `false` for a timer that is no longer
    /// this recognizer's pending one.
    pub fn fire_timer(&mut self, app: &GestureApplication, id: TimerId) -> bool {
        if self.timer != Some(id) {
            tracing::trace!(target: targets::RECOGNIZER, gesture = %self.name, ?id, "ignoring stale timer");
            return false;
        }
        self.timer = None;
        // The delivery kind decides the timeout marker; see `apply`.
        let source = EventSource::Timeout(TimeoutKind::Cancel);
        self.run(app, source, |g, ctx| g.timer_fired(ctx));
        true
    }

    /// Run one hook and apply what it requested.
    fn run<R>(
        &mut self,
        app: &GestureApplication,
        source: EventSource,
        hook: impl FnOnce(&mut dyn Gesture, &mut GestureContext<'_>) -> R,
    ) -> R {
        let mut ctx = GestureContext::new(&self.touches, self.state, app.now(), source);
        let result = hook(self.gesture.as_mut(), &mut ctx);
        let effects = ctx.into_effects();
        self.apply(app, effects);
        result
    }

    fn apply(&mut self, app: &GestureApplication, effects: Effects) {
        if effects.state != self.state {
            self.transition(effects.state);
        }
        match effects.timer {
            TimerRequest::Keep => {}
            TimerRequest::Arm(after) => self.arm_timer(app, after),
            TimerRequest::Disarm => self.disarm_timer(app),
        }
        for kind in effects.deliveries {
            let source = match effects.source {
                EventSource::Timeout(_) => EventSource::Timeout(match kind {
                    GestureEventKind::End => TimeoutKind::End,
                    _ => TimeoutKind::Cancel,
                }),
                touch => touch,
            };
            self.deliver(kind, source);
        }
        if effects.reset_touches {
            self.touches.clear();
        }
        self.keep_waiting |= effects.keep_waiting;
    }

    fn transition(&mut self, to: GestureState) {
        if self.state != to {
            tracing::trace!(target: targets::RECOGNIZER, gesture = %self.name, view = ?self.owner.view, from = ?self.state, ?to, "state transition");
        }
        self.state = to;
    }

    /// Claim application-wide exclusivity for non-simultaneous gestures.
    fn acquire_exclusivity(&self, app: &GestureApplication) -> bool {
        if self.simultaneously {
            return true;
        }
        let acquired = app.acquire_exclusive(self.owner.view);
        if !acquired {
            tracing::warn!(
                target: targets::RECOGNIZER,
                gesture = %self.name,
                view = ?self.owner.view,
                holder = ?app.blocker(),
                "exclusivity held elsewhere, not beginning"
            );
        }
        acquired
    }

    fn arm_timer(&mut self, app: &GestureApplication, after: Duration) {
        self.disarm_timer(app);
        self.timer = Some(app.timers().start(app.now(), after, self.owner));
    }

    fn disarm_timer(&mut self, app: &GestureApplication) {
        if let Some(id) = self.timer.take() {
            // Already-fired timers are gone from the queue; nothing to undo.
            let _ = app.timers().stop(id);
        }
    }

    /// Call the view's handler; a rejection rolls the gesture back.
    fn deliver(&mut self, kind: GestureEventKind, source: EventSource) -> bool {
        let event = GestureEvent {
            gesture: self.name.clone(),
            kind,
            view: self.owner.view,
            state: self.state,
            detail: self.gesture.detail(),
            touches: self.touches.touches().to_vec(),
            source,
        };

        let accepted = match self.handlers.gesture_handler(&self.name, kind) {
            Some(handler) => handler(&event),
            None => true,
        };
        tracing::debug!(target: targets::RECOGNIZER, event = %event.handler_name(), view = ?self.owner.view, accepted, "delivered gesture event");

        if !accepted {
            self.gesture.event_was_rejected();
        }
        accepted
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("name", &self.name)
            .field("view", &self.owner.view)
            .field("state", &self.state)
            .field("touches", &self.touches.len())
            .field("required_touches", &self.required_touches)
            .field("simultaneously", &self.simultaneously)
            .field("timer", &self.timer)
            .finish()
    }
}
