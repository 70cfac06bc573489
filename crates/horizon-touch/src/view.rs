//! The view tree that hosts gesture managers.
//!
//! Views live in a slotmap arena with parent and child links. Each view
//! carries its handler table, its gesture options and, once prepared, a
//! [`GestureManager`]. Touch events enter at a target view and bubble to the
//! root:
//!
//! 1. the view's own raw-phase handler runs,
//! 2. unless every gesture is blocked, the view's recognizers are offered the
//!    event (subject to exclusivity, enablement and delegates),
//! 3. the event moves on to the parent.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use horizon_touch_core::PerfSpan;
use horizon_touch_core::logging::{span_names, targets};
use slotmap::{SlotMap, new_key_type};

use crate::application::GestureApplication;
use crate::binding::{BoolSource, Enablement};
use crate::error::{GestureError, Result};
use crate::handlers::ViewHandlers;
use crate::manager::GestureManager;
use crate::options::{GestureConfig, GestureOptions};
use crate::recognizer::{Recognizer, RecognizerConfig, RecognizerRef};
use crate::touch::TouchEvent;

new_key_type! {
    /// A stable handle to a view in a [`ViewTree`].
    ///
    /// Becomes invalid when the view is removed.
    pub struct ViewId;
}

/// Distinguishes view trees that share one [`GestureApplication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

struct ViewNode {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    handlers: Arc<ViewHandlers>,
    config: GestureConfig,
    sources: HashMap<String, Arc<BoolSource>>,
    manager: Option<GestureManager>,
}

/// A hierarchy of views bound to a shared gesture context.
pub struct ViewTree {
    id: TreeId,
    app: Arc<GestureApplication>,
    views: SlotMap<ViewId, ViewNode>,
}

impl ViewTree {
    pub fn new(app: Arc<GestureApplication>) -> Self {
        Self {
            id: TreeId::next(),
            app,
            views: SlotMap::with_key(),
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn app(&self) -> &Arc<GestureApplication> {
        &self.app
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Add a view under `parent` (or as a root).
    pub fn add_view(
        &mut self,
        parent: Option<ViewId>,
        handlers: ViewHandlers,
        config: GestureConfig,
    ) -> Result<ViewId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = self.views.insert(ViewNode {
            parent,
            children: Vec::new(),
            handlers: Arc::new(handlers),
            config,
            sources: HashMap::new(),
            manager: None,
        });
        if let Some(parent) = parent.and_then(|p| self.views.get_mut(p)) {
            parent.children.push(id);
        }
        tracing::trace!(target: targets::VIEW, ?id, ?parent, "view added");
        Ok(id)
    }

    /// Remove a view and all its descendants, stopping their timers.
    #[tracing::instrument(skip(self), target = "horizon_touch::view", level = "trace")]
    pub fn remove_view(&mut self, id: ViewId) -> Result<()> {
        let mut doomed = Vec::new();
        self.collect_descendants(id, &mut doomed)?;
        doomed.push(id);

        if let Some(parent) = self.views.get(id).and_then(|n| n.parent) {
            if let Some(parent) = self.views.get_mut(parent) {
                parent.children.retain(|&child| child != id);
            }
        }

        for view in doomed {
            if let Some(node) = self.views.remove(view) {
                if let Some(manager) = &node.manager {
                    manager.stop_timers(&self.app);
                }
            }
        }
        Ok(())
    }

    fn collect_descendants(&self, id: ViewId, out: &mut Vec<ViewId>) -> Result<()> {
        let node = self.node(id)?;
        for &child in &node.children {
            self.collect_descendants(child, out)?;
            out.push(child);
        }
        Ok(())
    }

    /// Move a view under a new parent, or make it a root.
    pub fn set_parent(&mut self, id: ViewId, parent: Option<ViewId>) -> Result<()> {
        self.node(id)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if self.is_ancestor_of(id, parent) {
                return Err(GestureError::CircularParentage { view: id });
            }
        }

        if let Some(old) = self.views.get(id).and_then(|n| n.parent) {
            if let Some(old) = self.views.get_mut(old) {
                old.children.retain(|&child| child != id);
            }
        }
        if let Some(node) = self.views.get_mut(id) {
            node.parent = parent;
        }
        if let Some(parent) = parent.and_then(|p| self.views.get_mut(p)) {
            parent.children.push(id);
        }
        Ok(())
    }

    fn is_ancestor_of(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut current = Some(id);
        while let Some(view) = current {
            if view == ancestor {
                return true;
            }
            current = self.views.get(view).and_then(|n| n.parent);
        }
        false
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn parent(&self, id: ViewId) -> Result<Option<ViewId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: ViewId) -> Result<&[ViewId]> {
        Ok(self.node(id)?.children.as_slice())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn node(&self, id: ViewId) -> Result<&ViewNode> {
        self.views.get(id).ok_or(GestureError::UnknownView(id))
    }

    fn node_mut(&mut self, id: ViewId) -> Result<&mut ViewNode> {
        self.views.get_mut(id).ok_or(GestureError::UnknownView(id))
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace a gesture's options. Takes effect when the view is next
    /// prepared, so call it before the first dispatch or after
    /// [`reset_gestures`](Self::reset_gestures).
    pub fn set_options(&mut self, id: ViewId, gesture: &str, options: GestureOptions) -> Result<()> {
        self.node_mut(id)?.config.set(gesture, options);
        Ok(())
    }

    /// Publish a boolean source visible to this view's `isEnabledBinding`s.
    pub fn add_bool_source(
        &mut self,
        id: ViewId,
        name: impl Into<String>,
        source: Arc<BoolSource>,
    ) -> Result<()> {
        self.node_mut(id)?.sources.insert(name.into(), source);
        Ok(())
    }

    /// Drop a view's manager; it is rebuilt from the current options on the
    /// next dispatch.
    pub fn reset_gestures(&mut self, id: ViewId) -> Result<()> {
        if let Some(manager) = self.node_mut(id)?.manager.take() {
            manager.stop_timers(&self.app);
        }
        Ok(())
    }

    // =========================================================================
    // Gesture managers
    // =========================================================================

    /// Create the view's gesture manager if it doesn't exist yet.
    ///
    /// One recognizer is created per registered gesture for which the view
    /// handles a Start, Change or End event.
    pub fn prepare(&mut self, id: ViewId) -> Result<()> {
        let node = self.node(id)?;
        if node.manager.is_some() {
            return Ok(());
        }

        let mut recognizers = Vec::new();
        for (name, factory) in self.app.known_gestures() {
            if !node.handlers.wants_gesture(&name) {
                continue;
            }
            let options = node.config.options_for(&name);
            let gesture = factory(&options)?;
            let config = RecognizerConfig {
                required_touches: options
                    .number_of_required_touches
                    .unwrap_or_else(|| gesture.default_required_touches()),
                simultaneously: options.simultaneously.unwrap_or(true),
                enabled: self.enablement(node, &options)?,
                delegate: match (&options.delegate, &options.delegate_name) {
                    (Some(delegate), _) => Some(delegate.clone()),
                    (None, Some(name)) => Some(
                        self.app
                            .find_delegate(name)
                            .ok_or_else(|| GestureError::unknown_delegate(name.as_str()))?,
                    ),
                    (None, None) => None,
                },
            };
            let owner = RecognizerRef {
                tree: self.id,
                view: id,
                slot: recognizers.len(),
            };
            recognizers.push(Recognizer::new(
                name,
                owner,
                gesture,
                config,
                node.handlers.clone(),
            ));
        }

        tracing::debug!(
            target: targets::MANAGER,
            view = ?id,
            gestures = ?recognizers.iter().map(Recognizer::name).collect::<Vec<_>>(),
            "gesture manager created"
        );
        self.node_mut(id)?.manager = Some(GestureManager::new(id, recognizers));
        Ok(())
    }

    fn enablement(&self, node: &ViewNode, options: &GestureOptions) -> Result<Enablement> {
        let Some(path) = &options.is_enabled_binding else {
            return Ok(Enablement::Fixed(options.is_enabled.unwrap_or(true)));
        };
        let source = node
            .sources
            .get(path)
            .cloned()
            .or_else(|| self.app.bool_source(path))
            .ok_or_else(|| GestureError::unknown_binding(path.as_str()))?;
        Ok(Enablement::bound(path.as_str(), source))
    }

    pub fn manager(&self, id: ViewId) -> Option<&GestureManager> {
        self.views.get(id)?.manager.as_ref()
    }

    pub fn manager_mut(&mut self, id: ViewId) -> Option<&mut GestureManager> {
        self.views.get_mut(id)?.manager.as_mut()
    }

    pub fn recognizer(&self, id: ViewId, gesture: &str) -> Option<&Recognizer> {
        self.manager(id)?.recognizer(gesture)
    }

    pub fn recognizer_mut(&mut self, id: ViewId, gesture: &str) -> Option<&mut Recognizer> {
        self.manager_mut(id)?.recognizer_mut(gesture)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver a raw touch event to `target` and bubble it to the root.
    pub fn dispatch(&mut self, target: ViewId, event: &TouchEvent) -> Result<()> {
        self.node(target)?;
        let _span = PerfSpan::new(span_names::DISPATCH);
        tracing::trace!(target: targets::VIEW, ?target, phase = event.phase.handler_name(), touches = event.touches.len(), "dispatching touch event");

        let mut current = Some(target);
        while let Some(view) = current {
            self.prepare(view)?;
            let direct = self.node(view)?.handlers.touch_handler(event.phase).cloned();
            if let Some(handler) = direct {
                handler(event);
            }

            if self.app.is_all_blocked() {
                tracing::trace!(target: targets::VIEW, ?view, "all gestures blocked, not bubbling");
                break;
            }

            let Some(node) = self.views.get_mut(view) else {
                break;
            };
            if let Some(manager) = node.manager.as_mut() {
                manager.dispatch(&self.app, event);
            }
            current = node.parent;
        }
        Ok(())
    }

    /// Fire every expired timer armed by this tree's recognizers. Returns how
    /// many reached a recognizer.
    pub fn process_timers(&mut self) -> usize {
        let _span = PerfSpan::new(span_names::TIMERS);
        let mut fired = 0;
        for (id, owner) in self.app.pop_expired_timers(self.id) {
            let recognizer = self
                .views
                .get_mut(owner.view)
                .and_then(|node| node.manager.as_mut())
                .and_then(|manager| manager.recognizer_at_mut(owner.slot));
            match recognizer {
                Some(recognizer) => {
                    if recognizer.fire_timer(&self.app, id) {
                        fired += 1;
                    }
                }
                None => {
                    tracing::trace!(target: targets::VIEW, ?id, ?owner, "timer owner is gone");
                }
            }
        }
        fired
    }

    /// Time until the next timer in the shared context expires.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.app.time_until_next_timer()
    }

    /// Release exclusivity held by `id`.
    pub fn unblock_gestures(&mut self, id: ViewId) -> Result<()> {
        self.node(id)?;
        self.app.unblock(id)
    }
}

impl std::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("id", &self.id)
            .field("views", &self.views.len())
            .finish()
    }
}
