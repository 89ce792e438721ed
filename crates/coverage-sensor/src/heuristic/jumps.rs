//! Branch distance heuristics for conditional jumps
//!
//! For numeric comparisons the distance of the outcome that was *not* taken
//! is the smallest integer change to the left operand that would flip the
//! decision, so `x == 10` with `x = 7` has distance 3 to the "then" side,
//! while `x < 10` with `x = 12` has distance 3 (x would need to drop to 9).
//! Distances go through [`normalize`], so a non-taken side scores in
//! (0, 0.5] and the taken side scores exactly 1.0.
//!
//! References carry no meaningful distance: the non-taken side gets a flat
//! floor score.

use super::comparison::{ComparisonKind, OperandShape};
use super::truthness::{normalize, Truthness};
use crate::result::{SensorError, SensorResult};

/// Branch distance engine
///
/// Stateless apart from the score given to the non-taken side of
/// reference comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpHeuristics {
    reference_floor: f64,
}

impl Default for JumpHeuristics {
    fn default() -> Self {
        Self {
            reference_floor: 0.0,
        }
    }
}

impl JumpHeuristics {
    /// Create an engine with the given reference floor, in [0,1)
    pub fn new(reference_floor: f64) -> SensorResult<Self> {
        if !(0.0..1.0).contains(&reference_floor) {
            return Err(SensorError::config(format!(
                "Reference floor {reference_floor} out of range [0,1)"
            )));
        }
        Ok(Self { reference_floor })
    }

    /// Score given to the non-taken side of reference comparisons
    #[must_use]
    pub const fn reference_floor(&self) -> f64 {
        self.reference_floor
    }

    /// One integer compared against zero
    pub fn for_single_value(&self, value: i64, kind: ComparisonKind) -> SensorResult<Truthness> {
        self.for_value_comparison(value, 0, kind)
    }

    /// Two integers
    pub fn for_value_comparison(
        &self,
        first: i64,
        second: i64,
        kind: ComparisonKind,
    ) -> SensorResult<Truthness> {
        let t = match kind {
            ComparisonKind::Eq => equality(first, second),
            ComparisonKind::Ne => equality(first, second).invert(),
            ComparisonKind::Lt => less_than(first, second),
            ComparisonKind::Ge => less_than(first, second).invert(),
            ComparisonKind::Gt => less_than(second, first),
            ComparisonKind::Le => less_than(second, first).invert(),
            ComparisonKind::RefEq
            | ComparisonKind::RefNe
            | ComparisonKind::IsNull
            | ComparisonKind::NonNull => return Err(kind.shape_error(OperandShape::Numeric)),
        };
        Ok(t)
    }

    /// Two references compared for identity
    ///
    /// Two absent references are the same reference. Identity is the
    /// address, so distinct values of a zero-sized type may share one and
    /// compare as the same reference.
    pub fn for_reference_comparison<T: ?Sized>(
        &self,
        first: Option<&T>,
        second: Option<&T>,
        kind: ComparisonKind,
    ) -> SensorResult<Truthness> {
        kind.expect_shape(OperandShape::Reference)?;
        let same = address(first) == address(second);
        let t = self.binary(same);
        Ok(if kind == ComparisonKind::RefEq {
            t
        } else {
            t.invert()
        })
    }

    /// One reference compared against absence
    pub fn for_null_check<T: ?Sized>(
        &self,
        value: Option<&T>,
        kind: ComparisonKind,
    ) -> SensorResult<Truthness> {
        kind.expect_shape(OperandShape::Nullness)?;
        let t = self.binary(value.is_none());
        Ok(if kind == ComparisonKind::IsNull {
            t
        } else {
            t.invert()
        })
    }

    fn binary(&self, holds: bool) -> Truthness {
        if holds {
            Truthness::taken_true(self.reference_floor)
        } else {
            Truthness::taken_false(self.reference_floor)
        }
    }
}

/// `a == b`
fn equality(a: i64, b: i64) -> Truthness {
    if a == b {
        // one step in either direction makes them differ
        Truthness::taken_true(normalize(1.0))
    } else {
        Truthness::taken_false(normalize(gap(a, b)))
    }
}

/// `a < b`
fn less_than(a: i64, b: i64) -> Truthness {
    if a < b {
        Truthness::taken_true(normalize(gap(a, b)))
    } else {
        Truthness::taken_false(normalize(gap(a, b) + 1.0))
    }
}

/// `|a - b|` without overflow
fn gap(a: i64, b: i64) -> f64 {
    (i128::from(a) - i128::from(b)).unsigned_abs() as f64
}

fn address<T: ?Sized>(reference: Option<&T>) -> Option<*const u8> {
    reference.map(|r| (r as *const T).cast::<u8>())
}
