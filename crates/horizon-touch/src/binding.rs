//! Observable boolean sources and recognizer enablement.
//!
//! A recognizer's `isEnabledBinding` names a [`BoolSource`] registered on
//! the view (or application-wide). The recognizer reads the source through a
//! cached [`Binding`] that the source's change signal invalidates, so toggling
//! the source enables or disables the recognizer for subsequent touches
//! without touching the recognizer itself.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_touch_core::{Binding, ConnectionGuard, Property, Signal};

/// An observable boolean value.
pub struct BoolSource {
    value: Property<bool>,
    changed: Arc<Signal<bool>>,
}

impl BoolSource {
    /// Create a shared source with an initial value.
    pub fn new(initial: bool) -> Arc<Self> {
        Arc::new(Self {
            value: Property::new(initial),
            changed: Arc::new(Signal::new()),
        })
    }

    pub fn get(&self) -> bool {
        self.value.get()
    }

    /// Set the value, notifying observers if it changed.
    pub fn set(&self, value: bool) {
        if self.value.set(value) {
            self.changed.emit(value);
        }
    }

    /// Signal emitted with the new value after each change.
    pub fn changed(&self) -> &Arc<Signal<bool>> {
        &self.changed
    }
}

impl fmt::Debug for BoolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoolSource")
            .field("value", &self.get())
            .field("observers", &self.changed.connection_count())
            .finish()
    }
}

/// Whether a recognizer accepts touches.
pub enum Enablement {
    /// A fixed flag (`isEnabled`).
    Fixed(bool),
    /// Live-bound to a boolean source (`isEnabledBinding`).
    Bound {
        path: String,
        binding: Arc<Binding<bool>>,
        _connection: ConnectionGuard<bool>,
    },
}

impl Enablement {
    /// Bind to `source`. The binding lives as long as the returned value.
    pub fn bound(path: impl Into<String>, source: Arc<BoolSource>) -> Self {
        let changed = source.changed().clone();
        let binding = Arc::new(Binding::new(move || source.get()));
        let weak: Weak<Binding<bool>> = Arc::downgrade(&binding);
        let connection = ConnectionGuard::connect(&changed, move |_: &bool| {
            if let Some(binding) = weak.upgrade() {
                binding.invalidate();
            }
        });
        Self::Bound {
            path: path.into(),
            binding,
            _connection: connection,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Fixed(enabled) => *enabled,
            Self::Bound { binding, .. } => binding.get(),
        }
    }

    /// The bound path, if live-bound.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Bound { path, .. } => Some(path),
        }
    }
}

impl fmt::Debug for Enablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(enabled) => f.debug_tuple("Fixed").field(enabled).finish(),
            Self::Bound { path, binding, .. } => f
                .debug_struct("Bound")
                .field("path", path)
                .field("value", &binding.get())
                .finish(),
        }
    }
}
