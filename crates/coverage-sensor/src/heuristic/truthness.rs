//! Truthness: how close a branch came to each of its outcomes

use crate::objective::check_score;
use crate::result::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};

/// Closeness of a two-way branch to its "then" and "else" outcomes
///
/// Both components are in [0,1]. The outcome actually taken scores 1.0; the
/// other one scores below 1.0 and grows as the operands get closer to
/// flipping the decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTruthness")]
pub struct Truthness {
    of_true: f64,
    of_false: f64,
}

impl Truthness {
    /// The "then" outcome was taken; `of_false` is the closeness to "else"
    pub(crate) const fn taken_true(of_false: f64) -> Self {
        Self {
            of_true: 1.0,
            of_false,
        }
    }

    /// The "else" outcome was taken; `of_true` is the closeness to "then"
    pub(crate) const fn taken_false(of_true: f64) -> Self {
        Self {
            of_true,
            of_false: 1.0,
        }
    }

    /// Build a pair from externally computed scores
    pub fn new(of_true: f64, of_false: f64) -> SensorResult<Self> {
        check_score(of_true)?;
        check_score(of_false)?;
        Ok(Self { of_true, of_false })
    }

    /// Closeness to the "then" outcome
    #[inline]
    #[must_use]
    pub const fn of_true(self) -> f64 {
        self.of_true
    }

    /// Closeness to the "else" outcome
    #[inline]
    #[must_use]
    pub const fn of_false(self) -> f64 {
        self.of_false
    }

    /// Swap the two outcomes (truthness of the negated condition)
    #[must_use]
    pub const fn invert(self) -> Self {
        Self {
            of_true: self.of_false,
            of_false: self.of_true,
        }
    }

    /// Whether the "then" outcome was taken
    #[must_use]
    pub fn is_true(self) -> bool {
        self.of_true >= 1.0
    }

    /// Whether the "else" outcome was taken
    #[must_use]
    pub fn is_false(self) -> bool {
        self.of_false >= 1.0
    }
}

#[derive(Deserialize)]
struct RawTruthness {
    of_true: f64,
    of_false: f64,
}

impl TryFrom<RawTruthness> for Truthness {
    type Error = SensorError;

    fn try_from(raw: RawTruthness) -> SensorResult<Self> {
        Self::new(raw.of_true, raw.of_false)
    }
}

/// Map a non-negative distance into (0,1]
///
/// Distance 0 maps to 1.0, larger distances approach 0 without reaching it.
#[inline]
#[must_use]
pub fn normalize(distance: f64) -> f64 {
    debug_assert!(distance >= 0.0);
    1.0 / (1.0 + distance)
}
