//! Objective records and score validation

use super::ObjectiveId;
use crate::result::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};

/// Score of a fully satisfied objective
pub const COVERED: f64 = 1.0;

/// Score of a call site that was entered but ended with a failure
pub const FAILED_CALL: f64 = 0.5;

/// Best score observed for one objective in the current test execution
///
/// Deserialization rejects scores outside [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct ObjectiveRecord {
    /// Objective identifier
    pub id: ObjectiveId,
    /// Score in [0,1]; 1.0 means covered
    pub value: f64,
    /// Action of the test case that produced this score
    pub action_index: usize,
}

impl ObjectiveRecord {
    /// Create a record
    #[must_use]
    pub fn new(id: ObjectiveId, value: f64, action_index: usize) -> Self {
        Self {
            id,
            value,
            action_index,
        }
    }

    /// Whether the objective is fully satisfied
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.value >= COVERED
    }
}

#[derive(Deserialize)]
struct RawRecord {
    id: ObjectiveId,
    value: f64,
    action_index: usize,
}

impl TryFrom<RawRecord> for ObjectiveRecord {
    type Error = SensorError;

    fn try_from(raw: RawRecord) -> SensorResult<Self> {
        check_score(raw.value)?;
        Ok(Self::new(raw.id, raw.value, raw.action_index))
    }
}

/// Reject scores outside [0,1] (NaN included)
#[inline]
pub fn check_score(value: f64) -> SensorResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SensorError::invalid(format!(
            "Invalid value {value} out of range [0,1]"
        )))
    }
}
