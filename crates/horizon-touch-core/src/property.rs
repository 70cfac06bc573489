//! Observable values and cached derivations.
//!
//! Gesture enablement is built from these two pieces: a host-owned
//! [`Property<bool>`] holds the flag, and each recognizer bound to it reads
//! through a [`Binding<bool>`] that the flag's change signal marks stale.
//!
//! # Example
//!
//! ```
//! use horizon_touch_core::{Property, Signal};
//!
//! struct Toggle {
//!     value: Property<bool>,
//!     changed: Signal<bool>,
//! }
//!
//! impl Toggle {
//!     fn set(&self, on: bool) {
//!         if self.value.set(on) {
//!             self.changed.emit(on);
//!         }
//!     }
//! }
//!
//! let toggle = Toggle { value: Property::new(false), changed: Signal::new() };
//! toggle.set(true);
//! assert!(toggle.value.get());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// A shared value whose writes report whether anything changed.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A copy of the stored value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`. Returns `false` when it equals what was already stored,
    /// in which case observers should not be notified.
    pub fn set(&self, value: T) -> bool {
        let mut slot = self.value.write();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

/// A value derived from other state, recomputed only when marked stale.
///
/// Starts stale, so the first [`get`](Self::get) always evaluates.
pub struct Binding<T> {
    evaluate: Box<dyn Fn() -> T + Send + Sync>,
    last: RwLock<Option<T>>,
    stale: AtomicBool,
}

impl<T: Clone + Send + Sync + 'static> Binding<T> {
    pub fn new<F>(evaluate: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            evaluate: Box::new(evaluate),
            last: RwLock::new(None),
            stale: AtomicBool::new(true),
        }
    }

    /// The last computed value, re-evaluating first if stale.
    pub fn get(&self) -> T {
        if !self.stale.load(Ordering::Acquire)
            && let Some(value) = self.last.read().as_ref()
        {
            return value.clone();
        }
        let fresh = (self.evaluate)();
        *self.last.write() = Some(fresh.clone());
        self.stale.store(false, Ordering::Release);
        fresh
    }

    /// Force the next `get` to re-evaluate.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }
}

impl<T: Clone + fmt::Debug + Send + Sync + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("stale", &self.is_stale())
            .field("last", &*self.last.read())
            .finish()
    }
}
