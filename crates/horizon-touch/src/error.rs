//! Error types for gesture configuration and arbitration.

use horizon_touch_core::CoreError;

use crate::view::ViewId;

/// Result type alias for gesture operations.
pub type Result<T> = std::result::Result<T, GestureError>;

/// Errors raised synchronously by registration, preparation and exclusivity calls.
///
/// Nothing on the touch dispatch path produces these; thresholds not met,
/// disabled recognizers and refused exclusivity are ordinary state transitions.
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    /// A gesture name was registered twice.
    #[error("'{name}' already exists as a registered gesture; gesture names must be unique")]
    DuplicateGesture { name: String },

    /// `block` was called while another block is held.
    #[error("exclusivity is already held by view {holder:?}")]
    AlreadyBlocked { holder: ViewId },

    /// `unblock` was called with no block held.
    #[error("cannot unblock: gesture recognition is not blocked")]
    NotBlocked,

    /// `unblock` was called by a view that does not hold the block.
    #[error("view {requested:?} cannot unblock exclusivity held by view {holder:?}")]
    BlockerMismatch { requested: ViewId, holder: ViewId },

    /// A `delegateName` did not resolve to a registered delegate.
    #[error("no gesture delegate named '{name}'")]
    UnknownDelegate { name: String },

    /// An `isEnabledBinding` path did not resolve to a boolean source.
    #[error("no boolean source bound at '{path}'")]
    UnknownBinding { path: String },

    /// The view id is stale or belongs to another tree.
    #[error("unknown view {0:?}")]
    UnknownView(ViewId),

    /// Reparenting would make a view its own ancestor.
    #[error("view {view:?} cannot become a descendant of itself")]
    CircularParentage { view: ViewId },

    /// A gesture was configured with a touch count it cannot track.
    #[error("'{gesture}' supports {supported} required touch(es), got {required}")]
    UnsupportedTouchCount {
        gesture: String,
        required: usize,
        supported: usize,
    },

    /// Options could not be parsed or are inconsistent.
    #[error("invalid gesture options: {message}")]
    InvalidOptions { message: String },

    /// Error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl GestureError {
    /// Create a duplicate-registration error.
    pub fn duplicate_gesture(name: impl Into<String>) -> Self {
        Self::DuplicateGesture { name: name.into() }
    }

    /// Create an unknown-delegate error.
    pub fn unknown_delegate(name: impl Into<String>) -> Self {
        Self::UnknownDelegate { name: name.into() }
    }

    /// Create an unknown-binding error.
    pub fn unknown_binding(path: impl Into<String>) -> Self {
        Self::UnknownBinding { path: path.into() }
    }

    /// Create an options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for GestureError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_options(err.to_string())
    }
}

impl From<toml::de::Error> for GestureError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid_options(err.to_string())
    }
}
