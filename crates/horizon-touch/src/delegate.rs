//! Admission policy for recognizers.
//!
//! A [`GestureDelegate`] decides whether a recognizer gets to see a touch at
//! all, independently of the recognizer's state machine. It consults an
//! ordered chain of [`DelegateRule`]s; the first rule with an opinion wins,
//! and when no rule has one the delegate's own default applies.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_touch_core::logging::targets;

use crate::recognizer::Recognizer;
use crate::touch::TouchEvent;
use crate::view::ViewId;

/// One link of a delegate's rule chain.
pub trait DelegateRule: Send + Sync + fmt::Debug {
    /// `Some` decides admission; `None` defers to the next rule.
    fn should_receive_touch(
        &self,
        recognizer: &Recognizer,
        view: ViewId,
        event: &TouchEvent,
    ) -> Option<bool>;
}

/// A named admission policy that recognizers reference by name or instance.
pub trait GestureDelegate: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Rules consulted in order before the default.
    fn rules(&self) -> &[Arc<dyn DelegateRule>] {
        &[]
    }

    /// Default decision when no rule has an opinion.
    fn should_receive_touch(
        &self,
        _recognizer: &Recognizer,
        _view: ViewId,
        _event: &TouchEvent,
    ) -> bool {
        true
    }
}

/// Evaluate `delegate` for a recognizer about to receive `event`.
pub fn admits(
    delegate: &dyn GestureDelegate,
    recognizer: &Recognizer,
    view: ViewId,
    event: &TouchEvent,
) -> bool {
    for rule in delegate.rules() {
        if let Some(decision) = rule.should_receive_touch(recognizer, view, event) {
            return decision;
        }
    }
    delegate.should_receive_touch(recognizer, view, event)
}

/// Closure signature used by [`FnRule`].
pub type RuleFn = Arc<dyn Fn(&Recognizer, ViewId, &TouchEvent) -> Option<bool> + Send + Sync>;

/// Fallback signature used by [`RuleDelegate`].
pub type FallbackFn = Arc<dyn Fn(&Recognizer, ViewId, &TouchEvent) -> bool + Send + Sync>;

/// A rule backed by a closure.
#[derive(Clone)]
pub struct FnRule {
    label: String,
    rule: RuleFn,
}

impl FnRule {
    pub fn new<F>(label: impl Into<String>, rule: F) -> Arc<Self>
    where
        F: Fn(&Recognizer, ViewId, &TouchEvent) -> Option<bool> + Send + Sync + 'static,
    {
        Arc::new(Self {
            label: label.into(),
            rule: Arc::new(rule),
        })
    }
}

impl DelegateRule for FnRule {
    fn should_receive_touch(
        &self,
        recognizer: &Recognizer,
        view: ViewId,
        event: &TouchEvent,
    ) -> Option<bool> {
        (self.rule)(recognizer, view, event)
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnRule").field(&self.label).finish()
    }
}

/// A delegate assembled from a rule chain and an optional fallback.
pub struct RuleDelegate {
    name: String,
    rules: Vec<Arc<dyn DelegateRule>>,
    fallback: Option<FallbackFn>,
}

impl RuleDelegate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Append a rule to the chain.
    pub fn with_rule(mut self, rule: Arc<dyn DelegateRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Decision used when every rule defers.
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&Recognizer, ViewId, &TouchEvent) -> bool + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn build(self) -> Arc<dyn GestureDelegate> {
        Arc::new(self)
    }
}

impl GestureDelegate for RuleDelegate {
    fn name(&self) -> &str {
        &self.name
    }

    fn rules(&self) -> &[Arc<dyn DelegateRule>] {
        &self.rules
    }

    fn should_receive_touch(&self, recognizer: &Recognizer, view: ViewId, event: &TouchEvent) -> bool {
        match &self.fallback {
            Some(fallback) => fallback(recognizer, view, event),
            None => true,
        }
    }
}

impl fmt::Debug for RuleDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDelegate")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Delegates addressable by name.
#[derive(Debug, Default)]
pub struct DelegateRegistry {
    delegates: HashMap<String, Arc<dyn GestureDelegate>>,
}

impl DelegateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a delegate, replacing any existing one with the same name.
    pub fn add(&mut self, delegate: Arc<dyn GestureDelegate>) {
        let name = delegate.name().to_string();
        tracing::debug!(target: targets::REGISTRY, delegate = %name, "delegate added");
        self.delegates.insert(name, delegate);
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn GestureDelegate>> {
        self.delegates.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn GestureDelegate>> {
        self.delegates.remove(name)
    }

    pub fn clear(&mut self) {
        self.delegates.clear();
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}
