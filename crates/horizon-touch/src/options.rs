//! Per-view gesture configuration.
//!
//! Options are plain data so they can be loaded from JSON or TOML documents
//! shipped alongside a view description:
//!
//! ```toml
//! [panOptions]
//! direction = 2
//! simultaneously = false
//!
//! [tapOptions]
//! numberOfTaps = 2
//! ```
//!
//! Unknown keys are ignored and missing keys fall back to the gesture's own
//! defaults.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delegate::GestureDelegate;
use crate::error::{GestureError, Result};

/// Options recognized by the built-in gestures.
///
/// Periods are milliseconds and thresholds are pixels.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureOptions {
    pub number_of_required_touches: Option<usize>,
    /// Direction bitmask; meaning depends on the gesture.
    pub direction: Option<u8>,
    pub simultaneously: Option<bool>,
    pub is_enabled: Option<bool>,
    /// Name of a boolean source that enables the recognizer while true.
    pub is_enabled_binding: Option<String>,
    pub delegate_name: Option<String>,
    pub init_threshold: Option<f32>,
    pub delta_threshold: Option<f32>,
    pub swipe_threshold: Option<f32>,
    pub cancel_period: Option<u64>,
    pub number_of_taps: Option<u32>,
    pub delay_between_taps: Option<u64>,
    pub tap_threshold: Option<f32>,
    pub press_period_threshold: Option<u64>,
    pub move_threshold: Option<f32>,
    pub hold_period: Option<u64>,
    /// Delegate instance attached in code. Takes precedence over `delegate_name`.
    #[serde(skip)]
    pub delegate: Option<Arc<dyn GestureDelegate>>,
}

impl GestureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_touches(mut self, touches: usize) -> Self {
        self.number_of_required_touches = Some(touches);
        self
    }

    pub fn with_direction(mut self, direction: impl Into<u8>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn with_simultaneously(mut self, simultaneously: bool) -> Self {
        self.simultaneously = Some(simultaneously);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = Some(enabled);
        self
    }

    pub fn with_enabled_binding(mut self, path: impl Into<String>) -> Self {
        self.is_enabled_binding = Some(path.into());
        self
    }

    pub fn with_delegate_name(mut self, name: impl Into<String>) -> Self {
        self.delegate_name = Some(name.into());
        self
    }

    pub fn with_delegate(mut self, delegate: Arc<dyn GestureDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn with_init_threshold(mut self, threshold: f32) -> Self {
        self.init_threshold = Some(threshold);
        self
    }

    pub fn with_delta_threshold(mut self, threshold: f32) -> Self {
        self.delta_threshold = Some(threshold);
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = Some(threshold);
        self
    }

    pub fn with_cancel_period(mut self, ms: u64) -> Self {
        self.cancel_period = Some(ms);
        self
    }

    pub fn with_number_of_taps(mut self, taps: u32) -> Self {
        self.number_of_taps = Some(taps);
        self
    }

    pub fn with_delay_between_taps(mut self, ms: u64) -> Self {
        self.delay_between_taps = Some(ms);
        self
    }

    pub fn with_tap_threshold(mut self, threshold: f32) -> Self {
        self.tap_threshold = Some(threshold);
        self
    }

    pub fn with_press_period(mut self, ms: u64) -> Self {
        self.press_period_threshold = Some(ms);
        self
    }

    pub fn with_move_threshold(mut self, threshold: f32) -> Self {
        self.move_threshold = Some(threshold);
        self
    }

    pub fn with_hold_period(mut self, ms: u64) -> Self {
        self.hold_period = Some(ms);
        self
    }

    /// Parse options for a single gesture from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Milliseconds option, or `default` if unset.
pub(crate) fn millis(value: Option<u64>, default: u64) -> Duration {
    Duration::from_millis(value.unwrap_or(default))
}

impl fmt::Debug for GestureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureOptions")
            .field("number_of_required_touches", &self.number_of_required_touches)
            .field("direction", &self.direction)
            .field("simultaneously", &self.simultaneously)
            .field("is_enabled", &self.is_enabled)
            .field("is_enabled_binding", &self.is_enabled_binding)
            .field("delegate_name", &self.delegate_name)
            .field("delegate", &self.delegate.as_ref().map(|d| d.name().to_string()))
            .finish_non_exhaustive()
    }
}

const OPTIONS_SUFFIX: &str = "Options";

/// Gesture options for one view, keyed by gesture name.
#[derive(Debug, Clone, Default)]
pub struct GestureConfig {
    options: HashMap<String, GestureOptions>,
}

impl GestureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, gesture: impl Into<String>, options: GestureOptions) -> Self {
        self.set(gesture, options);
        self
    }

    /// Replace the options for `gesture`.
    pub fn set(&mut self, gesture: impl Into<String>, options: GestureOptions) {
        self.options.insert(gesture.into(), options);
    }

    pub fn get(&self, gesture: &str) -> Option<&GestureOptions> {
        self.options.get(gesture)
    }

    pub fn get_mut(&mut self, gesture: &str) -> Option<&mut GestureOptions> {
        self.options.get_mut(gesture)
    }

    /// Options for `gesture`, or the defaults.
    pub fn options_for(&self, gesture: &str) -> GestureOptions {
        self.get(gesture).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Parse a JSON object of `<name>Options` entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut config = Self::new();
        for (key, value) in document {
            if let Some(gesture) = gesture_name(&key) {
                config.set(gesture, serde_json::from_value(value)?);
            }
        }
        Ok(config)
    }

    /// Parse a TOML document of `[<name>Options]` tables.
    pub fn from_toml(source: &str) -> Result<Self> {
        let document: HashMap<String, toml::Value> = toml::from_str(source)?;
        let mut config = Self::new();
        for (key, value) in document {
            if let Some(gesture) = gesture_name(&key) {
                let options = GestureOptions::deserialize(value)
                    .map_err(|e| GestureError::invalid_options(format!("{key}: {e}")))?;
                config.set(gesture, options);
            }
        }
        Ok(config)
    }
}

fn gesture_name(key: &str) -> Option<&str> {
    key.strip_suffix(OPTIONS_SUFFIX).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_json_ignores_unknown_keys() {
        let options = GestureOptions::from_json(
            r#"{"numberOfRequiredTouches": 2, "simultaneously": false, "color": "red"}"#,
        )
        .unwrap();
        assert_eq!(options.number_of_required_touches, Some(2));
        assert_eq!(options.simultaneously, Some(false));
        assert_eq!(options.direction, None);
    }

    #[test]
    fn test_config_from_json_uses_options_suffix() {
        let config = GestureConfig::from_json(
            r#"{
                "panOptions": {"direction": 2, "initThreshold": 8},
                "tapOptions": {"numberOfTaps": 2, "delayBetweenTaps": 300},
                "title": "ignored"
            }"#,
        )
        .unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("pan").unwrap().direction, Some(2));
        assert_eq!(config.get("pan").unwrap().init_threshold, Some(8.0));
        assert_eq!(config.get("tap").unwrap().delay_between_taps, Some(300));
    }

    #[test]
    fn test_config_from_toml() {
        let config = GestureConfig::from_toml(
            r#"
            [pinchOptions]
            deltaThreshold = 12.5

            [touchHoldOptions]
            holdPeriod = 1000
            isEnabledBinding = "editing"
            "#,
        )
        .unwrap();
        assert_eq!(config.get("pinch").unwrap().delta_threshold, Some(12.5));
        let hold = config.get("touchHold").unwrap();
        assert_eq!(hold.hold_period, Some(1000));
        assert_eq!(hold.is_enabled_binding.as_deref(), Some("editing"));
    }

    #[test]
    fn test_config_rejects_malformed_options() {
        let err = GestureConfig::from_json(r#"{"panOptions": {"direction": "left"}}"#).unwrap_err();
        assert!(matches!(err, GestureError::InvalidOptions { .. }));
    }

    #[test]
    fn test_options_for_falls_back_to_defaults() {
        let config = GestureConfig::new().with("swipe", GestureOptions::new().with_direction(2u8));
        assert_eq!(config.options_for("swipe").direction, Some(2));
        assert_eq!(config.options_for("pan").direction, None);
    }

    #[test]
    fn test_millis_default() {
        assert_eq!(millis(None, 500), Duration::from_millis(500));
        assert_eq!(millis(Some(20), 500), Duration::from_millis(20));
    }
}
