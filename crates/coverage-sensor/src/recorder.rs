//! Forwarding of objective improvements to a session-wide recorder
//!
//! The registry only knows the current test execution. Whatever keeps track
//! of objectives across the whole search session subscribes through
//! [`ObjectiveRecorder`]. Forwarding happens on the instrumented program's
//! hot path, so implementations must never block: [`BufferedRecorder`] uses a
//! bounded lock-free queue and drops updates when the consumer falls behind.

use crate::objective::ObjectiveId;
use crossbeam_queue::ArrayQueue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// An improved score for one objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveUpdate {
    /// Objective identifier
    pub id: ObjectiveId,
    /// New best score in the current execution
    pub value: f64,
    /// Action that produced the score
    pub action_index: usize,
}

/// Receiver of objective improvements
///
/// Called from arbitrary threads of the instrumented program. Must not block
/// and must not fail.
pub trait ObjectiveRecorder: Send + Sync + Debug {
    /// Observe an improvement
    fn update(&self, update: ObjectiveUpdate);
}

/// Recorder that ignores every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl ObjectiveRecorder for NoopRecorder {
    #[inline]
    fn update(&self, _update: ObjectiveUpdate) {}
}

/// Bounded, drop-on-full recorder queue
#[derive(Debug)]
pub struct BufferedRecorder {
    queue: ArrayQueue<ObjectiveUpdate>,
    dropped: AtomicU64,
}

impl BufferedRecorder {
    /// Create a queue holding at most `capacity` pending updates
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            dropped: AtomicU64::new(0),
        }
    }

    /// Take every pending update, oldest first
    #[must_use]
    pub fn drain(&self) -> Vec<ObjectiveUpdate> {
        let mut updates = Vec::with_capacity(self.queue.len());
        while let Some(update) = self.queue.pop() {
            updates.push(update);
        }
        updates
    }

    /// Drain pending updates into a best-value map
    ///
    /// Keeps the maximum score per id, which is what a session-wide store
    /// needs from each execution.
    pub fn drain_into(&self, best: &mut BTreeMap<ObjectiveId, f64>) -> usize {
        let mut drained = 0;
        while let Some(update) = self.queue.pop() {
            drained += 1;
            let slot = best.entry(update.id).or_insert(update.value);
            if update.value > *slot {
                *slot = update.value;
            }
        }
        drained
    }

    /// Number of pending updates
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no updates are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of pending updates
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Updates discarded because the queue was full
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ObjectiveRecorder for BufferedRecorder {
    fn update(&self, update: ObjectiveUpdate) {
        if let Err(update) = self.queue.push(update) {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            // log the first drop and then every power of two
            if dropped.is_power_of_two() {
                tracing::warn!(
                    dropped,
                    capacity = self.queue.capacity(),
                    last = %update.id,
                    "objective recorder queue full, dropping updates"
                );
            }
        }
    }
}
