//! Polled one-shot timers.
//!
//! Each timer carries an owner tag so an expiry can be routed back to
//! whoever armed it. The queue never reads a clock: every call takes `now`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// Handle to a pending timer.
    pub struct TimerId;
}

#[derive(Debug)]
struct Pending<T> {
    fire_at: Instant,
    owner: T,
}

/// A queue of pending one-shot timers tagged with an owner value.
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Pending<T>>,
    /// Earliest deadline on top. Stopped timers linger here until popped.
    queue: BinaryHeap<Reverse<(Instant, TimerId)>>,
}

impl<T: Copy + PartialEq + fmt::Debug> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Arm a timer due `duration` after `now`.
    pub fn start(&mut self, now: Instant, duration: Duration, owner: T) -> TimerId {
        let fire_at = now + duration;
        let id = self.timers.insert(Pending { fire_at, owner });
        self.queue.push(Reverse((fire_at, id)));
        tracing::trace!(target: targets::TIMER, ?id, ?owner, ?duration, "timer started");
        id
    }

    /// Disarm a pending timer. Fails once it has fired or been stopped.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        self.timers
            .remove(id)
            .map(|_| tracing::trace!(target: targets::TIMER, ?id, "timer stopped"))
            .ok_or_else(|| TimerError::UnknownTimer(id).into())
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// The owner a pending timer was started for.
    pub fn owner(&self, id: TimerId) -> Option<T> {
        self.timers.get(id).map(|t| t.owner)
    }

    /// How long after `now` the earliest pending timer is due.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stopped();
        self.queue
            .peek()
            .map(|Reverse((fire_at, _))| fire_at.saturating_duration_since(now))
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn pop_expired(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        self.pop_expired_matching(now, |_| true)
    }

    /// Like [`pop_expired`](Self::pop_expired), but only for owners accepted
    /// by `filter`. Due timers of other owners stay queued.
    #[tracing::instrument(skip(self, filter), target = "horizon_touch_core::timer", level = "trace")]
    pub fn pop_expired_matching<F>(&mut self, now: Instant, filter: F) -> Vec<(TimerId, T)>
    where
        F: Fn(&T) -> bool,
    {
        let mut fired = Vec::new();
        let mut deferred = Vec::new();

        while let Some(&Reverse((fire_at, id))) = self.queue.peek() {
            if fire_at > now {
                break;
            }
            let entry = self.queue.pop();

            let Some(timer) = self.timers.get(id) else {
                continue;
            };
            if !filter(&timer.owner) {
                deferred.extend(entry);
                continue;
            }
            let owner = timer.owner;
            self.timers.remove(id);

            tracing::trace!(target: targets::TIMER, ?id, ?owner, "timer fired");
            fired.push((id, owner));
        }

        self.queue.extend(deferred);
        fired
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of pending timers started for `owner`.
    pub fn active_for(&self, owner: T) -> usize {
        self.timers.values().filter(|t| t.owner == owner).count()
    }

    /// Remove every pending timer started for `owner`.
    pub fn stop_all_for(&mut self, owner: T) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, t| t.owner != owner);
        before - self.timers.len()
    }

    fn discard_stopped(&mut self) {
        while let Some(Reverse((_, id))) = self.queue.peek() {
            if self.timers.contains_key(*id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<T: Copy + PartialEq + fmt::Debug> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.timers.len())
            .finish()
    }
}

/// A [`TimerQueue`] behind a mutex, for sharing between view trees.
#[derive(Debug)]
pub struct SharedTimerQueue<T> {
    inner: Mutex<TimerQueue<T>>,
}

impl<T: Copy + PartialEq + fmt::Debug> SharedTimerQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerQueue::new()),
        }
    }

    pub fn start(&self, now: Instant, duration: Duration, owner: T) -> TimerId {
        self.inner.lock().start(now, duration, owner)
    }

    pub fn stop(&self, id: TimerId) -> Result<()> {
        self.inner.lock().stop(id)
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.inner.lock().time_until_next(now)
    }

    pub fn pop_expired(&self, now: Instant) -> Vec<(TimerId, T)> {
        self.inner.lock().pop_expired(now)
    }

    pub fn pop_expired_matching<F>(&self, now: Instant, filter: F) -> Vec<(TimerId, T)>
    where
        F: Fn(&T) -> bool,
    {
        self.inner.lock().pop_expired_matching(now, filter)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }

    pub fn active_for(&self, owner: T) -> usize {
        self.inner.lock().active_for(owner)
    }

    pub fn stop_all_for(&self, owner: T) -> usize {
        self.inner.lock().stop_all_for(owner)
    }
}

impl<T: Copy + PartialEq + fmt::Debug> Default for SharedTimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
