//! Built-in gestures.
//!
//! Each gesture is a [`Gesture`](crate::Gesture) implementation plugged into
//! the recognizer engine. Pan, pinch and rotate are continuous; press, tap
//! and touch-hold are discrete; swipe is continuous but ends itself as soon
//! as the swipe threshold is crossed.

use std::fmt;
use std::ops::BitOr;

mod pan;
mod pinch;
mod press;
mod rotate;
mod swipe;
mod tap;
mod touch_hold;

pub use pan::PanGesture;
pub use pinch::PinchGesture;
pub use press::PressGesture;
pub use rotate::RotateGesture;
pub use swipe::SwipeGesture;
pub use tap::TapGesture;
pub use touch_hold::TouchHoldGesture;

pub const PAN: &str = "pan";
pub const PINCH: &str = "pinch";
pub const PRESS: &str = "press";
pub const ROTATE: &str = "rotate";
pub const SWIPE: &str = "swipe";
pub const TAP: &str = "tap";
pub const TOUCH_HOLD: &str = "touchHold";

/// Axes along which a pan may begin.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanDirection(u8);

impl PanDirection {
    pub const VERTICAL: Self = Self(1);
    pub const HORIZONTAL: Self = Self(2);
    pub const BOTH: Self = Self(1 | 2);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl Default for PanDirection {
    fn default() -> Self {
        Self::BOTH
    }
}

impl BitOr for PanDirection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<PanDirection> for u8 {
    fn from(direction: PanDirection) -> Self {
        direction.0
    }
}

impl fmt::Debug for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = [(Self::VERTICAL, "Vertical"), (Self::HORIZONTAL, "Horizontal")]
            .into_iter()
            .filter(|(d, _)| self.contains(*d))
            .map(|(_, n)| n)
            .collect();
        write!(f, "PanDirection({})", names.join(" | "))
    }
}

/// Directions a swipe may be recognized in.
///
/// When several directions are enabled, they are tested in the order
/// right, left, down, up and the first match wins.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwipeDirection(u8);

impl SwipeDirection {
    pub const RIGHT: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const DOWN: Self = Self(4);
    pub const UP: Self = Self(8);

    /// Single directions in priority order.
    pub const PRIORITY: [Self; 4] = [Self::RIGHT, Self::LEFT, Self::DOWN, Self::UP];

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Movement along this direction for a displacement of `(dx, dy)`, in
    /// screen coordinates (y grows downwards).
    pub(crate) fn progress(self, dx: f32, dy: f32) -> f32 {
        match self {
            Self::RIGHT => dx,
            Self::LEFT => -dx,
            Self::DOWN => dy,
            Self::UP => -dy,
            _ => 0.0,
        }
    }

    /// First enabled direction whose progress exceeds `threshold`.
    ///
    /// The comparison is strict: progress of exactly `threshold` does not
    /// count, so a swipe covering exactly `swipeThreshold` does not end.
    pub(crate) fn first_exceeding(self, dx: f32, dy: f32, threshold: f32) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .filter(|d| self.contains(*d))
            .find(|d| d.progress(dx, dy) > threshold)
    }
}

impl Default for SwipeDirection {
    fn default() -> Self {
        Self::RIGHT
    }
}

impl BitOr for SwipeDirection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<SwipeDirection> for u8 {
    fn from(direction: SwipeDirection) -> Self {
        direction.0
    }
}

impl fmt::Debug for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = [
            (Self::RIGHT, "Right"),
            (Self::LEFT, "Left"),
            (Self::DOWN, "Down"),
            (Self::UP, "Up"),
        ]
        .into_iter()
        .filter(|(d, _)| self.contains(*d))
        .map(|(_, n)| n)
        .collect();
        write!(f, "SwipeDirection({})", names.join(" | "))
    }
}
