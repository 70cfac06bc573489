//! The shared gesture context.
//!
//! Everything that is application-wide in gesture recognition lives in a
//! [`GestureApplication`]: the gesture registry, the delegate registry, the
//! exclusivity coordinator, the timer queue and the clock. It is created
//! explicitly and handed to each [`ViewTree`](crate::ViewTree), so
//! independent UI roots can share one context or each own their own.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_touch::{GestureApplication, RotateGesture};
//!
//! let app = Arc::new(GestureApplication::new());
//! app.register_gesture_type::<RotateGesture>("rotate").unwrap();
//! assert!(app.register_gesture_type::<RotateGesture>("rotate").is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_touch_core::{Clock, SharedTimerQueue, SystemClock, TimerId};
use parking_lot::{Mutex, RwLock};

use crate::binding::BoolSource;
use crate::coordinator::{AdmissionPredicate, ExclusivityCoordinator};
use crate::delegate::{DelegateRegistry, GestureDelegate};
use crate::error::Result;
use crate::recognizer::{Gesture, RecognizerRef};
use crate::registry::{FromOptions, GestureFactory, GestureRegistry};
use crate::view::{TreeId, ViewId};

/// Shared, thread-safe gesture state. Locks are never held while calling
/// into view handlers or delegates.
pub struct GestureApplication {
    /// Registered gesture types, in registration order.
    registry: RwLock<GestureRegistry>,
    /// Named admission delegates.
    delegates: RwLock<DelegateRegistry>,
    /// Exclusivity slot and kill switch.
    coordinator: Mutex<ExclusivityCoordinator>,
    /// One-shot recognizer timers.
    timers: SharedTimerQueue<RecognizerRef>,
    /// Time source for timestamps and timers.
    clock: Arc<dyn Clock>,
    /// Application-wide boolean sources for `isEnabledBinding`.
    sources: RwLock<HashMap<String, Arc<BoolSource>>>,
}

impl GestureApplication {
    /// A context with the default gestures and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// A context with the default gestures and a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_registry(GestureRegistry::with_defaults(), clock)
    }

    pub fn with_registry(registry: GestureRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: RwLock::new(registry),
            delegates: RwLock::new(DelegateRegistry::new()),
            coordinator: Mutex::new(ExclusivityCoordinator::new()),
            timers: SharedTimerQueue::new(),
            clock,
            sources: RwLock::new(HashMap::new()),
        }
    }

    /// The current time according to the context's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // =========================================================================
    // Gesture registry
    // =========================================================================

    /// Register a gesture factory. Fails if the name is taken.
    pub fn register_gesture(&self, name: impl Into<String>, factory: GestureFactory) -> Result<()> {
        self.registry.write().register(name, factory)
    }

    /// Register a gesture type. Fails if the name is taken.
    pub fn register_gesture_type<G>(&self, name: impl Into<String>) -> Result<()>
    where
        G: Gesture + FromOptions + 'static,
    {
        self.registry.write().register_type::<G>(name)
    }

    pub fn unregister_gesture(&self, name: &str) -> bool {
        self.registry.write().unregister(name)
    }

    pub fn is_gesture_registered(&self, name: &str) -> bool {
        self.registry.read().is_registered(name)
    }

    /// Registered gestures and their factories, in registration order.
    pub fn known_gestures(&self) -> Vec<(String, GestureFactory)> {
        self.registry.read().known_gestures()
    }

    // =========================================================================
    // Delegates
    // =========================================================================

    /// Add a delegate, replacing one with the same name.
    pub fn add_delegate(&self, delegate: Arc<dyn GestureDelegate>) {
        self.delegates.write().add(delegate);
    }

    pub fn find_delegate(&self, name: &str) -> Option<Arc<dyn GestureDelegate>> {
        self.delegates.read().find(name)
    }

    pub fn clear_delegates(&self) {
        self.delegates.write().clear();
    }

    // =========================================================================
    // Exclusivity
    // =========================================================================

    /// Take the exclusivity block for `view`.
    pub fn block(&self, view: ViewId, predicate: AdmissionPredicate) -> Result<()> {
        self.coordinator.lock().block(view, predicate)
    }

    /// Release the block held by `view`.
    pub fn unblock(&self, view: ViewId) -> Result<()> {
        self.coordinator.lock().unblock(view)
    }

    pub fn is_blocked(&self) -> bool {
        self.coordinator.lock().is_blocked()
    }

    pub fn blocker(&self) -> Option<ViewId> {
        self.coordinator.lock().blocker()
    }

    pub fn set_all_blocked(&self, blocked: bool) {
        self.coordinator.lock().set_all_blocked(blocked);
    }

    pub fn is_all_blocked(&self) -> bool {
        self.coordinator.lock().is_all_blocked()
    }

    /// Whether `view` passes the current block.
    pub fn should_receive_touch(&self, view: ViewId) -> bool {
        // Evaluate outside the lock; predicates may query the context.
        let predicate = self.coordinator.lock().predicate();
        predicate.is_none_or(|p| p(view))
    }

    pub(crate) fn acquire_exclusive(&self, view: ViewId) -> bool {
        self.coordinator.lock().acquire(view)
    }

    // =========================================================================
    // Boolean sources
    // =========================================================================

    /// Publish a boolean source under `name` for `isEnabledBinding`.
    pub fn add_bool_source(&self, name: impl Into<String>, source: Arc<BoolSource>) {
        self.sources.write().insert(name.into(), source);
    }

    pub fn bool_source(&self, name: &str) -> Option<Arc<BoolSource>> {
        self.sources.read().get(name).cloned()
    }

    // =========================================================================
    // Timers
    // =========================================================================

    pub(crate) fn timers(&self) -> &SharedTimerQueue<RecognizerRef> {
        &self.timers
    }

    /// Time until the next recognizer timer expires.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next(self.now())
    }

    /// Remove and return the expired timers armed by recognizers of `tree`.
    pub(crate) fn pop_expired_timers(&self, tree: TreeId) -> Vec<(TimerId, RecognizerRef)> {
        self.timers
            .pop_expired_matching(self.now(), |owner| owner.tree == tree)
    }

    pub(crate) fn stop_timers_for(&self, owner: RecognizerRef) -> usize {
        self.timers.stop_all_for(owner)
    }

    /// Number of armed timers owned by a recognizer.
    pub fn live_timers_for(&self, owner: RecognizerRef) -> usize {
        self.timers.active_for(owner)
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.active_count()
    }
}

impl Default for GestureApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GestureApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureApplication")
            .field("registry", &*self.registry.read())
            .field("delegates", &self.delegates.read().len())
            .field("coordinator", &*self.coordinator.lock())
            .field("timers", &self.timers.active_count())
            .finish()
    }
}
