//! Comparison kinds reported by branch instrumentation

use crate::result::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand shape a comparison kind applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// One or two integers
    Numeric,
    /// Two references compared for identity
    Reference,
    /// One reference compared against absence
    Nullness,
}

/// The condition guarding the "then" side of a two-way branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonKind {
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// Same reference
    RefEq,
    /// Different references
    RefNe,
    /// Reference is absent
    IsNull,
    /// Reference is present
    NonNull,
}

/// JVM conditional jump opcodes
pub mod opcode {
    #![allow(missing_docs)]
    pub const IFEQ: i32 = 153;
    pub const IFNE: i32 = 154;
    pub const IFLT: i32 = 155;
    pub const IFGE: i32 = 156;
    pub const IFGT: i32 = 157;
    pub const IFLE: i32 = 158;
    pub const IF_ICMPEQ: i32 = 159;
    pub const IF_ICMPNE: i32 = 160;
    pub const IF_ICMPLT: i32 = 161;
    pub const IF_ICMPGE: i32 = 162;
    pub const IF_ICMPGT: i32 = 163;
    pub const IF_ICMPLE: i32 = 164;
    pub const IF_ACMPEQ: i32 = 165;
    pub const IF_ACMPNE: i32 = 166;
    pub const IFNULL: i32 = 198;
    pub const IFNONNULL: i32 = 199;
}

impl ComparisonKind {
    /// Shape of the operands this kind compares
    #[must_use]
    pub const fn shape(self) -> OperandShape {
        match self {
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => {
                OperandShape::Numeric
            }
            Self::RefEq | Self::RefNe => OperandShape::Reference,
            Self::IsNull | Self::NonNull => OperandShape::Nullness,
        }
    }

    /// Logical negation
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
            Self::RefEq => Self::RefNe,
            Self::RefNe => Self::RefEq,
            Self::IsNull => Self::NonNull,
            Self::NonNull => Self::IsNull,
        }
    }

    /// Condition under which a JVM conditional jump is taken
    ///
    /// Single-operand opcodes (`IFEQ` .. `IFLE`) compare against zero and
    /// map to the same numeric kinds as their `IF_ICMP` counterparts.
    pub fn from_opcode(op: i32) -> SensorResult<Self> {
        use opcode::*;
        let kind = match op {
            IFEQ | IF_ICMPEQ => Self::Eq,
            IFNE | IF_ICMPNE => Self::Ne,
            IFLT | IF_ICMPLT => Self::Lt,
            IFGE | IF_ICMPGE => Self::Ge,
            IFGT | IF_ICMPGT => Self::Gt,
            IFLE | IF_ICMPLE => Self::Le,
            IF_ACMPEQ => Self::RefEq,
            IF_ACMPNE => Self::RefNe,
            IFNULL => Self::IsNull,
            IFNONNULL => Self::NonNull,
            other => {
                return Err(SensorError::unsupported(format!(
                    "Unknown jump opcode {other}"
                )))
            }
        };
        Ok(kind)
    }

    /// Condition guarding the "then" block of a source `if` compiled to `op`
    ///
    /// Compilers emit the negated test and jump over the "then" block, so the
    /// source condition is the negation of the jump condition.
    pub fn from_jump_over(op: i32) -> SensorResult<Self> {
        Self::from_opcode(op).map(Self::negate)
    }

    /// Fail unless this kind applies to `shape`
    pub(crate) fn expect_shape(self, shape: OperandShape) -> SensorResult<()> {
        if self.shape() == shape {
            Ok(())
        } else {
            Err(self.shape_error(shape))
        }
    }

    pub(crate) fn shape_error(self, shape: OperandShape) -> SensorError {
        SensorError::unsupported(format!("{self} cannot compare {shape:?} operands"))
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::RefEq => "same",
            Self::RefNe => "not same",
            Self::IsNull => "is null",
            Self::NonNull => "is not null",
        };
        f.write_str(symbol)
    }
}
