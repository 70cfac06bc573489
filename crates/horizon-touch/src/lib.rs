//! Horizon Touch - multi-touch gesture recognition for view hierarchies.
//!
//! Raw touch events enter a [`ViewTree`] at a target view and bubble toward
//! the root. Every view that declares gesture handlers gets one recognizer
//! per handled gesture; recognizers run a shared state machine and compete
//! for application-wide exclusivity through the [`GestureApplication`]
//! context.
//!
//! Built-in gestures: pan, pinch, press, swipe, tap and touch-hold, plus a
//! rotate gesture that can be registered on demand. Custom gestures
//! implement [`Gesture`] and [`FromOptions`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_touch::{GestureApplication, GestureConfig, TouchEvent, TouchPoint, ViewHandlers, ViewTree};
//!
//! let app = Arc::new(GestureApplication::new());
//! let mut tree = ViewTree::new(app);
//!
//! let handlers = ViewHandlers::new().on_end("tap", |event| {
//!     println!("tapped {:?}", event.view);
//!     true
//! });
//! let view = tree.add_view(None, handlers, GestureConfig::new())?;
//!
//! tree.dispatch(view, &TouchEvent::start(vec![TouchPoint::new(1, 10.0, 10.0)]))?;
//! tree.dispatch(view, &TouchEvent::end(vec![TouchPoint::new(1, 10.0, 10.0)]))?;
//! # Ok::<(), horizon_touch::GestureError>(())
//! ```
//!
//! Timers drive swipe, tap and touch-hold. Hosts poll them:
//!
//! ```ignore
//! if let Some(wait) = tree.time_until_next_timer() {
//!     // schedule a wake-up after `wait`, then:
//!     tree.process_timers();
//! }
//! ```

mod application;
mod binding;
mod coordinator;
mod delegate;
mod error;
pub mod gestures;
mod handlers;
mod input;
mod manager;
mod options;
mod recognizer;
mod registry;
mod touch;
mod view;

#[cfg(test)]
mod testing;

pub use horizon_touch_core::{Clock, ManualClock, Point, SystemClock};

pub use application::GestureApplication;
pub use binding::{BoolSource, Enablement};
pub use coordinator::{AdmissionPredicate, ExclusivityCoordinator};
pub use delegate::{
    DelegateRegistry, DelegateRule, FallbackFn, FnRule, GestureDelegate, RuleDelegate, RuleFn,
    admits,
};
pub use error::{GestureError, Result};
pub use gestures::{
    PanDirection, PanGesture, PinchGesture, PressGesture, RotateGesture, SwipeDirection,
    SwipeGesture, TapGesture, TouchHoldGesture,
};
pub use handlers::{GestureHandler, TouchHandler, ViewHandlers};
pub use input::{TouchInputHandler, from_winit_touch_phase};
pub use manager::GestureManager;
pub use options::{GestureConfig, GestureOptions};
pub use recognizer::{
    EventSource, Gesture, GestureContext, GestureDetail, GestureEvent, GestureEventKind,
    GestureState, Recognizer, RecognizerConfig, RecognizerRef, TimeoutKind,
};
pub use registry::{FromOptions, GestureFactory, GestureRegistry};
pub use touch::{TouchEvent, TouchId, TouchPhase, TouchPoint, TouchSet, center_point, distance};
pub use view::{TreeId, ViewId, ViewTree};
