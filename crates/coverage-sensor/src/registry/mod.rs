//! Coverage Objective Registry
//!
//! Holds, for the current test execution, the best score seen for every
//! objective and the action that produced it.
//!
//! # Lifecycle
//!
//! ```text
//! reset() ──► set_action_index(0) ──► record_*() ... ──► set_action_index(1) ──► record_*() ...
//!                                                                                   │
//!                                       snapshot() / queries ◄──────────────────────┘
//! ```
//!
//! `reset` must not race with updates; everything else may be called from
//! any number of threads. A score only replaces the stored one when it is
//! strictly greater, so concurrent updates of one id always settle on the
//! maximum submitted value.

mod action;
mod shard;
mod snapshot;

pub use snapshot::{ObjectiveSnapshot, ObjectiveSummary};

use crate::config::{SensorConfig, MAX_SHARD_COUNT};
use crate::heuristic::Truthness;
use crate::objective::{
    check_score, ObjectiveId, ObjectiveRecord, COVERED, FAILED_CALL,
};
use crate::recorder::{NoopRecorder, ObjectiveRecorder, ObjectiveUpdate};
use crate::result::{SensorError, SensorResult};
use action::ActionCursor;
use shard::{Merge, ShardedObjectives};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Best-so-far objective scores of one test execution
#[derive(Debug)]
pub struct ObjectiveRegistry {
    objectives: ShardedObjectives,
    action: ActionCursor,
    recorder: Arc<dyn ObjectiveRecorder>,
}

impl Default for ObjectiveRegistry {
    fn default() -> Self {
        Self::new(&SensorConfig::default())
    }
}

impl ObjectiveRegistry {
    /// Create a registry that forwards nothing
    #[must_use]
    pub fn new(config: &SensorConfig) -> Self {
        Self::with_recorder(config, Arc::new(NoopRecorder))
    }

    /// Create a registry forwarding improvements to `recorder`
    #[must_use]
    pub fn with_recorder(config: &SensorConfig, recorder: Arc<dyn ObjectiveRecorder>) -> Self {
        let shards = config
            .shard_count
            .clamp(1, MAX_SHARD_COUNT)
            .next_power_of_two();
        Self {
            objectives: ShardedObjectives::new(shards, config.shard_capacity()),
            action: ActionCursor::default(),
            recorder,
        }
    }

    /// Clear every record and rewind the action cursor
    ///
    /// Call before each test execution, while nothing else touches the
    /// registry.
    pub fn reset(&self) {
        let cleared = self.objectives.len();
        self.objectives.clear();
        self.action.reset();
        tracing::debug!(cleared, "objective registry reset");
    }

    /// Attribute subsequent updates to action `index`
    pub fn set_action_index(&self, index: i32) -> SensorResult<()> {
        let index = self.action.set(index)?;
        tracing::debug!(index, "action index set");
        Ok(())
    }

    /// Current action index
    #[must_use]
    pub fn action_index(&self) -> usize {
        self.action.get()
    }

    /// A line was executed
    pub fn record_line_reached(&self, class_name: &str, line: i32) -> SensorResult<()> {
        let id = ObjectiveId::line(class_name, line)?;
        self.update_objective(&id, COVERED).map(drop)
    }

    /// A call site returned (`completed`) or raised a failure
    pub fn record_method_call_outcome(
        &self,
        class_name: &str,
        line: i32,
        call_site_index: i32,
        completed: bool,
    ) -> SensorResult<()> {
        let id = ObjectiveId::success_call(class_name, line, call_site_index)?;
        let value = if completed { COVERED } else { FAILED_CALL };
        self.update_objective(&id, value).map(drop)
    }

    /// A two-way branch was evaluated
    pub fn record_branch_outcome(
        &self,
        class_name: &str,
        line: i32,
        branch_id: i32,
        truthness: Truthness,
    ) -> SensorResult<()> {
        let (on_true, on_false) = ObjectiveId::branch_pair(class_name, line, branch_id)?;
        check_score(truthness.of_true())?;
        check_score(truthness.of_false())?;
        let _ = self.update_objective(&on_true, truthness.of_true())?;
        let _ = self.update_objective(&on_false, truthness.of_false())?;
        Ok(())
    }

    /// Offer `value` for `id`, keeping the best score
    ///
    /// Returns whether the stored score changed. Improvements are forwarded to
    /// the recorder.
    pub fn update_objective(&self, id: &ObjectiveId, value: f64) -> SensorResult<bool> {
        check_score(value)?;
        let action_index = self.action.get();

        let merge = self.objectives.merge(id, value, action_index);
        if merge.changed() {
            match merge {
                Merge::Improved { previous } => {
                    tracing::trace!(%id, previous, value, action_index, "objective improved");
                }
                _ => tracing::trace!(%id, value, action_index, "objective reached"),
            }
            self.recorder.update(ObjectiveUpdate {
                id: id.clone(),
                value,
                action_index,
            });
        }
        Ok(merge.changed())
    }

    /// Number of objectives encountered
    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Whether no objective was encountered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of objectives whose id starts with `prefix`
    ///
    /// `None` or `""` counts everything.
    #[must_use]
    pub fn number_of_objectives(&self, prefix: Option<&str>) -> usize {
        let mut count = 0;
        self.objectives.for_each(|id, _, _| {
            if id.matches_prefix(prefix) {
                count += 1;
            }
        });
        count
    }

    /// Number of encountered objectives still below 1.0
    ///
    /// Only objectives reached so far are known, so this is relative to the
    /// executed code, not to the whole program.
    #[must_use]
    pub fn number_of_non_covered_objectives(&self, prefix: Option<&str>) -> usize {
        let mut count = 0;
        self.objectives.for_each(|id, value, _| {
            if value < COVERED && id.matches_prefix(prefix) {
                count += 1;
            }
        });
        count
    }

    /// Ids of encountered objectives still below 1.0
    #[must_use]
    pub fn non_covered_objectives(&self, prefix: Option<&str>) -> BTreeSet<ObjectiveId> {
        let mut ids = BTreeSet::new();
        self.objectives.for_each(|id, value, _| {
            if value < COVERED && id.matches_prefix(prefix) {
                let _ = ids.insert(id.clone());
            }
        });
        ids
    }

    /// Number of objectives at 1.0
    #[must_use]
    pub fn covered_count(&self, prefix: Option<&str>) -> usize {
        let mut count = 0;
        self.objectives.for_each(|id, value, _| {
            if value >= COVERED && id.matches_prefix(prefix) {
                count += 1;
            }
        });
        count
    }

    /// Best score for `id`
    pub fn value(&self, id: &str) -> SensorResult<f64> {
        self.record(id).map(|record| record.value)
    }

    /// Full record for `id`
    pub fn record(&self, id: &str) -> SensorResult<ObjectiveRecord> {
        self.objectives.get(id).ok_or_else(|| SensorError::NotFound {
            id: id.to_string(),
        })
    }

    /// Copy of every record, sorted by id
    #[must_use]
    pub fn snapshot(&self) -> ObjectiveSnapshot {
        let mut records = Vec::with_capacity(self.objectives.len());
        self.objectives.for_each(|id, value, action_index| {
            records.push(ObjectiveRecord::new(id.clone(), value, action_index));
        });
        ObjectiveSnapshot::new(records)
    }
}

#[cfg(test)]
mod tests;
