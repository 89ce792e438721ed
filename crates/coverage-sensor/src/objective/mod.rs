//! Coverage objectives: identifiers and records
//!
//! An objective is one coverage goal the search tries to satisfy: a line
//! reached, one side of a branch taken, or a call site completing without a
//! failure. This module only names and describes objectives; scoring happens
//! in [`crate::heuristic`] and bookkeeping in [`crate::registry`].

mod class_name;
mod id;
mod record;

pub use class_name::normalize_class_name;
pub use id::{
    pad_line, ObjectiveId, ObjectiveKind, Polarity, BRANCH, FALSE_BRANCH, LINE, SUCCESS_CALL,
    TRUE_BRANCH,
};
pub use record::{check_score, ObjectiveRecord, COVERED, FAILED_CALL};
