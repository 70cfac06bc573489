//! Gesture type registry.
//!
//! Maps gesture names to factories. Registration order is significant: a
//! view's recognizers are created, and receive touches, in the order their
//! gestures were registered.

use std::fmt;
use std::sync::Arc;

use horizon_touch_core::logging::targets;

use crate::error::{GestureError, Result};
use crate::gestures::{self, PanGesture, PinchGesture, PressGesture, SwipeGesture, TapGesture, TouchHoldGesture};
use crate::options::GestureOptions;
use crate::recognizer::Gesture;

/// Builds a gesture instance from a view's options.
pub type GestureFactory = Arc<dyn Fn(&GestureOptions) -> Result<Box<dyn Gesture>> + Send + Sync>;

/// A gesture type constructible from options.
pub trait FromOptions: Sized {
    fn from_options(options: &GestureOptions) -> Result<Self>;
}

/// Insertion-ordered mapping from gesture name to factory.
#[derive(Default)]
pub struct GestureRegistry {
    entries: Vec<(String, GestureFactory)>,
}

impl GestureRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in gestures: pan, pinch, press, swipe, tap
    /// and touchHold. Rotate is available but must be registered explicitly.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.entries = vec![
            (gestures::PAN.to_string(), factory::<PanGesture>()),
            (gestures::PINCH.to_string(), factory::<PinchGesture>()),
            (gestures::PRESS.to_string(), factory::<PressGesture>()),
            (gestures::SWIPE.to_string(), factory::<SwipeGesture>()),
            (gestures::TAP.to_string(), factory::<TapGesture>()),
            (gestures::TOUCH_HOLD.to_string(), factory::<TouchHoldGesture>()),
        ];
        registry
    }

    /// Register a factory under `name`. Fails if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, factory: GestureFactory) -> Result<()> {
        let name = name.into();
        if self.is_registered(&name) {
            return Err(GestureError::duplicate_gesture(name));
        }
        tracing::debug!(target: targets::REGISTRY, gesture = %name, "gesture registered");
        self.entries.push((name, factory));
        Ok(())
    }

    /// Register a gesture type under `name`.
    pub fn register_type<G>(&mut self, name: impl Into<String>) -> Result<()>
    where
        G: Gesture + FromOptions + 'static,
    {
        self.register(name, factory::<G>())
    }

    /// Remove a registration. Returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        let removed = self.entries.len() != before;
        if removed {
            tracing::debug!(target: targets::REGISTRY, gesture = %name, "gesture unregistered");
        }
        removed
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Registered names with their factories, in registration order.
    pub fn known_gestures(&self) -> Vec<(String, GestureFactory)> {
        self.entries.clone()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn factory(&self, name: &str) -> Option<GestureFactory> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.clone())
    }

    /// Instantiate the gesture registered as `name`, if any.
    pub fn create(&self, name: &str, options: &GestureOptions) -> Result<Option<Box<dyn Gesture>>> {
        self.factory(name).map(|f| f(options)).transpose()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for GestureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn factory<G>() -> GestureFactory
where
    G: Gesture + FromOptions + 'static,
{
    Arc::new(|options| Ok(Box::new(G::from_options(options)?) as Box<dyn Gesture>))
}
