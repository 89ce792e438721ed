//! Objective Snapshots
//!
//! A frozen copy of the registry taken after a test execution, sorted by id.
//! This is what the search engine turns into fitness values:
//! - every record with its best score and action
//! - per-kind summary statistics
//! - JSON export for handing results to another process

use crate::objective::{ObjectiveId, ObjectiveKind, ObjectiveRecord};
use crate::result::SensorResult;
use serde::{Deserialize, Serialize};

/// Summary statistics for one objective kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSummary {
    /// Objective kind
    pub kind: ObjectiveKind,
    /// Objectives of this kind encountered during the execution
    pub total: usize,
    /// Objectives with score 1.0
    pub covered: usize,
    /// Mean score over all objectives of this kind
    pub mean_value: f64,
}

impl ObjectiveSummary {
    /// Covered share in percent
    ///
    /// Only objectives reached during the execution are known, so this is
    /// relative to what was executed, not to the whole program.
    #[must_use]
    pub fn coverage_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0; // Vacuously true
        }
        (self.covered as f64 / self.total as f64) * 100.0
    }
}

/// Sorted copy of every objective record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSnapshot {
    records: Vec<ObjectiveRecord>,
}

impl ObjectiveSnapshot {
    /// Build a snapshot, sorting records by id
    #[must_use]
    pub fn new(mut records: Vec<ObjectiveRecord>) -> Self {
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Self { records }
    }

    /// All records, sorted by id
    #[must_use]
    pub fn records(&self) -> &[ObjectiveRecord] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ObjectiveRecord> {
        self.records
            .binary_search_by(|r| r.id.as_str().cmp(id))
            .ok()
            .map(|index| &self.records[index])
    }

    /// Records whose id starts with `prefix` (`None` matches all)
    pub fn with_prefix<'a>(
        &'a self,
        prefix: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ObjectiveRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.id.matches_prefix(prefix))
    }

    /// Ids of records below 1.0
    #[must_use]
    pub fn non_covered(&self, prefix: Option<&str>) -> Vec<&ObjectiveId> {
        self.records
            .iter()
            .filter(|r| r.id.matches_prefix(prefix) && !r.is_covered())
            .map(|r| &r.id)
            .collect()
    }

    /// Summary per objective kind, in id order
    #[must_use]
    pub fn summary(&self) -> Vec<ObjectiveSummary> {
        ObjectiveKind::ALL
            .into_iter()
            .map(|kind| {
                let (total, covered, sum) = self
                    .records
                    .iter()
                    .filter(|r| r.id.kind() == kind)
                    .fold((0, 0, 0.0), |(total, covered, sum), r| {
                        (total + 1, covered + usize::from(r.is_covered()), sum + r.value)
                    });
                ObjectiveSummary {
                    kind,
                    total,
                    covered,
                    mean_value: if total == 0 { 0.0 } else { sum / total as f64 },
                }
            })
            .collect()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SensorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> SensorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot exported with [`ObjectiveSnapshot::to_json`]
    pub fn from_json(json: &str) -> SensorResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        Ok(Self::new(snapshot.records))
    }
}
