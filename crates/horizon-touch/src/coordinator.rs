//! Application-wide gesture exclusivity.
//!
//! There is a single block slot. The holder installs an admission predicate
//! that every view's manager consults before letting its recognizers see a
//! touch. Blocks are released explicitly; nothing unblocks automatically.

use std::fmt;
use std::sync::Arc;

use horizon_touch_core::logging::targets;

use crate::error::{GestureError, Result};
use crate::view::ViewId;

/// Decides whether a view's recognizers may receive touches while blocked.
pub type AdmissionPredicate = Arc<dyn Fn(ViewId) -> bool + Send + Sync>;

struct Block {
    holder: ViewId,
    predicate: AdmissionPredicate,
}

/// The exclusivity semaphore plus the global kill switch.
#[derive(Default)]
pub struct ExclusivityCoordinator {
    all_blocked: bool,
    block: Option<Block>,
}

impl ExclusivityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every recognizer is switched off.
    pub fn is_all_blocked(&self) -> bool {
        self.all_blocked
    }

    pub fn set_all_blocked(&mut self, blocked: bool) {
        if self.all_blocked != blocked {
            tracing::debug!(target: targets::COORDINATOR, blocked, "all gestures blocked");
        }
        self.all_blocked = blocked;
    }

    pub fn is_blocked(&self) -> bool {
        self.block.is_some()
    }

    /// The view holding the block.
    pub fn blocker(&self) -> Option<ViewId> {
        self.block.as_ref().map(|b| b.holder)
    }

    /// Take the block for `view`.
    pub fn block(&mut self, view: ViewId, predicate: AdmissionPredicate) -> Result<()> {
        if let Some(block) = &self.block {
            return Err(GestureError::AlreadyBlocked {
                holder: block.holder,
            });
        }
        tracing::debug!(target: targets::COORDINATOR, ?view, "gestures blocked");
        self.block = Some(Block {
            holder: view,
            predicate,
        });
        Ok(())
    }

    /// Take the block for `view`, admitting only `view` itself.
    pub fn block_exclusive(&mut self, view: ViewId) -> Result<()> {
        self.block(view, Arc::new(move |candidate| candidate == view))
    }

    /// Release the block held by `view`.
    pub fn unblock(&mut self, view: ViewId) -> Result<()> {
        match &self.block {
            None => Err(GestureError::NotBlocked),
            Some(block) if block.holder != view => Err(GestureError::BlockerMismatch {
                requested: view,
                holder: block.holder,
            }),
            Some(_) => {
                tracing::debug!(target: targets::COORDINATOR, ?view, "gestures unblocked");
                self.block = None;
                Ok(())
            }
        }
    }

    /// Make sure `view` may run an exclusive gesture: take the block if it
    /// is free, succeed if `view` already holds it, refuse otherwise.
    pub fn acquire(&mut self, view: ViewId) -> bool {
        match self.blocker() {
            None => self.block_exclusive(view).is_ok(),
            Some(holder) => holder == view,
        }
    }

    /// The active predicate, for evaluation outside the lock.
    pub fn predicate(&self) -> Option<AdmissionPredicate> {
        self.block.as_ref().map(|b| b.predicate.clone())
    }

    /// Whether `view` passes the current block. Always true when unblocked.
    pub fn should_receive_touch(&self, view: ViewId) -> bool {
        self.block.as_ref().is_none_or(|b| (b.predicate)(view))
    }
}

impl fmt::Debug for ExclusivityCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusivityCoordinator")
            .field("all_blocked", &self.all_blocked)
            .field("blocker", &self.blocker())
            .finish()
    }
}
