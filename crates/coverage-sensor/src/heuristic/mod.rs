//! Branch distance heuristics
//!
//! Turns the operands of a two-way branch into a [`Truthness`] pair: a
//! continuous score for each outcome that the search can climb instead of a
//! plain taken / not-taken bit.
//!
//! # Shapes
//!
//! | Shape              | Kinds                          | Score of the non-taken side |
//! |--------------------|--------------------------------|-----------------------------|
//! | value vs zero      | `Eq Ne Lt Le Gt Ge`            | `1 / (1 + distance)`        |
//! | value vs value     | `Eq Ne Lt Le Gt Ge`            | `1 / (1 + distance)`        |
//! | reference identity | `RefEq RefNe`                  | reference floor             |
//! | null check         | `IsNull NonNull`               | reference floor             |

mod comparison;
mod jumps;
mod truthness;

pub use comparison::{opcode, ComparisonKind, OperandShape};
pub use jumps::JumpHeuristics;
pub use truthness::{normalize, Truthness};
