//! Sharded best-so-far map
//!
//! Ids are spread over a power-of-two number of shards. Each shard is a
//! read-write locked map whose values carry their own mutex, so an update of
//! an id that already exists takes a shared shard lock and one per-id lock.
//! Only the first update of an id takes the shard lock exclusively.

use crate::objective::{ObjectiveId, ObjectiveRecord};
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::{Entry, HashMap, RandomState};
use std::hash::BuildHasher;

/// Outcome of offering a score for an objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Merge {
    /// First score for this id
    Inserted,
    /// Score replaced a strictly smaller one
    Improved {
        /// Score before the update
        previous: f64,
    },
    /// Stored score was greater or equal and stays
    Kept,
}

impl Merge {
    pub(crate) const fn changed(self) -> bool {
        !matches!(self, Self::Kept)
    }
}

#[derive(Debug, Clone, Copy)]
struct Best {
    value: f64,
    action_index: usize,
}

impl Best {
    fn offer(&mut self, value: f64, action_index: usize) -> Merge {
        if value > self.value {
            let previous = self.value;
            self.value = value;
            self.action_index = action_index;
            Merge::Improved { previous }
        } else {
            Merge::Kept
        }
    }
}

type Shard = RwLock<HashMap<ObjectiveId, Mutex<Best>>>;

#[derive(Debug)]
pub(crate) struct ShardedObjectives {
    shards: Box<[Shard]>,
    mask: usize,
    hasher: RandomState,
}

impl ShardedObjectives {
    /// `shard_count` must be a power of two
    pub(crate) fn new(shard_count: usize, shard_capacity: usize) -> Self {
        debug_assert!(shard_count.is_power_of_two());
        let shards = (0..shard_count)
            .map(|_| RwLock::new(presized(shard_capacity)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            shards,
            mask: shard_count - 1,
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, id: &str) -> &Shard {
        let index = self.hasher.hash_one(id) as usize & self.mask;
        &self.shards[index]
    }

    /// Store `value` for `id` if it beats the current best
    pub(crate) fn merge(&self, id: &ObjectiveId, value: f64, action_index: usize) -> Merge {
        let shard = self.shard(id.as_str());

        if let Some(best) = shard.read().get(id.as_str()) {
            return best.lock().offer(value, action_index);
        }

        // another writer may have inserted between the two locks
        match shard.write().entry(id.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().get_mut().offer(value, action_index),
            Entry::Vacant(entry) => {
                let _ = entry.insert(Mutex::new(Best {
                    value,
                    action_index,
                }));
                Merge::Inserted
            }
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<ObjectiveRecord> {
        let shard = self.shard(id).read();
        shard.get_key_value(id).map(|(key, best)| {
            let best = *best.lock();
            ObjectiveRecord::new(key.clone(), best.value, best.action_index)
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// Visit every record, one shard at a time
    pub(crate) fn for_each(&self, mut visit: impl FnMut(&ObjectiveId, f64, usize)) {
        for shard in self.shards.iter() {
            for (id, best) in shard.read().iter() {
                let best = *best.lock();
                visit(id, best.value, best.action_index);
            }
        }
    }

    pub(crate) fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().clear();
        }
    }

    pub(crate) fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

/// Empty shard map, pre-allocated when the allocator allows it
fn presized(capacity: usize) -> HashMap<ObjectiveId, Mutex<Best>> {
    let mut map = HashMap::new();
    if let Err(error) = map.try_reserve(capacity) {
        tracing::warn!(capacity, %error, "shard pre-allocation failed, growing on demand");
    }
    map
}
