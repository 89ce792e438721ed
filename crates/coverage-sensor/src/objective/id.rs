//! Objective Identifiers
//!
//! Every coverage objective is named by a string built from the class, the
//! line and (for branches and calls) a position on that line. Line numbers
//! are zero-padded to five digits so that plain string ordering groups ids by
//! class and sorts them by position:
//!
//! ```text
//! Line_at_org.foo.Bar_00042
//! Branch_at_org.foo.Bar_at_line_00042_position_0_trueBranch
//! Branch_at_org.foo.Bar_at_line_00042_position_0_falseBranch
//! Success_Call_at_org.foo.Bar_00042_1
//! ```
//!
//! These strings are part of the contract with the search engine and with
//! already instrumented code. Do not change them.

use super::class_name::normalize_class_name;
use crate::result::{SensorError, SensorResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

/// Prefix identifier for line coverage objectives
pub const LINE: &str = "Line";

/// Prefix identifier for branch coverage objectives
pub const BRANCH: &str = "Branch";

/// Prefix identifier for objectives on calling methods without failures
pub const SUCCESS_CALL: &str = "Success_Call";

/// Tag for the "then" side of a branch
pub const TRUE_BRANCH: &str = "_trueBranch";

/// Tag for the "else" side of a branch
pub const FALSE_BRANCH: &str = "_falseBranch";

/// Kind of coverage objective, recoverable from the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// A source line was reached
    Line,
    /// One polarity of a two-way branch
    Branch,
    /// A method call site completed without a failure
    SuccessCall,
}

impl ObjectiveKind {
    /// All kinds, in id order
    pub const ALL: [Self; 3] = [Self::Branch, Self::Line, Self::SuccessCall];

    /// Literal id prefix for this kind
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Line => LINE,
            Self::Branch => BRANCH,
            Self::SuccessCall => SUCCESS_CALL,
        }
    }

    /// Kind of the given id string, if it uses one of the known prefixes
    #[must_use]
    pub fn of(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            id.strip_prefix(kind.prefix())
                .is_some_and(|rest| rest.starts_with("_at_"))
        })
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Side of a two-way branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// The "then" outcome
    True,
    /// The "else" outcome
    False,
}

impl Polarity {
    /// Id suffix for this side
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::True => TRUE_BRANCH,
            Self::False => FALSE_BRANCH,
        }
    }
}

/// Canonical objective identifier
///
/// Built only through the constructors below (or validated by
/// [`ObjectiveId::parse`]), so every value follows one of the three grammars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectiveId(String);

impl ObjectiveId {
    /// Id of the line objective at `class:line`
    pub fn line(class_name: &str, line: i32) -> SensorResult<Self> {
        let class = normalize_class_name(class_name)?;
        let line = pad_line(line)?;
        Ok(Self(format!("{LINE}_at_{class}_{line}")))
    }

    /// Id of the successful-call objective for the `index`-th call on `class:line`
    pub fn success_call(class_name: &str, line: i32, index: i32) -> SensorResult<Self> {
        let class = normalize_class_name(class_name)?;
        let line = pad_line(line)?;
        Ok(Self(format!("{SUCCESS_CALL}_at_{class}_{line}_{index}")))
    }

    /// Id of one side of the branch at `class:line`, position `branch_id`
    pub fn branch(
        class_name: &str,
        line: i32,
        branch_id: i32,
        polarity: Polarity,
    ) -> SensorResult<Self> {
        let mut location = branch_location(class_name, line, branch_id)?;
        location.push_str(polarity.suffix());
        Ok(Self(location))
    }

    /// Ids of both sides of a branch, `(true, false)`
    pub fn branch_pair(class_name: &str, line: i32, branch_id: i32) -> SensorResult<(Self, Self)> {
        let location = branch_location(class_name, line, branch_id)?;
        let on_true = format!("{location}{TRUE_BRANCH}");
        let on_false = location + FALSE_BRANCH;
        Ok((Self(on_true), Self(on_false)))
    }

    /// Validate an id produced elsewhere
    ///
    /// Accepts only canonical ids: the string must match one of the grammars
    /// and rebuilding it from its parts must give back the same bytes.
    pub fn parse(id: &str) -> SensorResult<Self> {
        let rebuilt = match ObjectiveKind::of(id) {
            Some(ObjectiveKind::Line) => line_pattern()
                .captures(id)
                .and_then(|c| Some(Self::line(c.get(1)?.as_str(), number(c.get(2)?)?)))
                .transpose()?,
            Some(ObjectiveKind::SuccessCall) => call_pattern()
                .captures(id)
                .and_then(|c| {
                    Some(Self::success_call(
                        c.get(1)?.as_str(),
                        number(c.get(2)?)?,
                        number(c.get(3)?)?,
                    ))
                })
                .transpose()?,
            Some(ObjectiveKind::Branch) => branch_pattern()
                .captures(id)
                .and_then(|c| {
                    let polarity = if c.get(4)?.as_str() == "true" {
                        Polarity::True
                    } else {
                        Polarity::False
                    };
                    Some(Self::branch(
                        c.get(1)?.as_str(),
                        number(c.get(2)?)?,
                        number(c.get(3)?)?,
                        polarity,
                    ))
                })
                .transpose()?,
            None => None,
        };

        match rebuilt {
            Some(parsed) if parsed.0 == id => Ok(parsed),
            _ => Err(SensorError::invalid(format!("Malformed objective id: {id}"))),
        }
    }

    /// Kind of this objective
    #[must_use]
    pub fn kind(&self) -> ObjectiveKind {
        // Constructors only produce known prefixes
        ObjectiveKind::of(&self.0).unwrap_or(ObjectiveKind::Line)
    }

    /// Branch side, for branch objectives
    #[must_use]
    pub fn polarity(&self) -> Option<Polarity> {
        if self.0.ends_with(TRUE_BRANCH) && self.kind() == ObjectiveKind::Branch {
            Some(Polarity::True)
        } else if self.0.ends_with(FALSE_BRANCH) && self.kind() == ObjectiveKind::Branch {
            Some(Polarity::False)
        } else {
            None
        }
    }

    /// The id string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id starts with `prefix` (`None` or empty matches everything)
    #[inline]
    #[must_use]
    pub fn matches_prefix(&self, prefix: Option<&str>) -> bool {
        prefix.map_or(true, |p| self.0.starts_with(p))
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectiveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ObjectiveId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectiveId {
    type Error = SensorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectiveId> for String {
    fn from(id: ObjectiveId) -> Self {
        id.0
    }
}

/// Render a line number with five-digit zero padding
///
/// Numbers of six or more digits are rendered as they are.
pub fn pad_line(line: i32) -> SensorResult<String> {
    if line < 0 {
        return Err(SensorError::invalid(format!(
            "Negative line number to pad: {line}"
        )));
    }
    Ok(format!("{line:05}"))
}

fn branch_location(class_name: &str, line: i32, branch_id: i32) -> SensorResult<String> {
    let class = normalize_class_name(class_name)?;
    let line = pad_line(line)?;
    Ok(format!(
        "{BRANCH}_at_{class}_at_line_{line}_position_{branch_id}"
    ))
}

fn number(m: regex::Match<'_>) -> Option<i32> {
    m.as_str().parse().ok()
}

#[allow(clippy::expect_used)]
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Line_at_(.+)_(\d{5,})$").expect("valid pattern"))
}

#[allow(clippy::expect_used)]
fn call_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Success_Call_at_(.+)_(\d{5,})_(-?\d+)$").expect("valid pattern")
    })
}

#[allow(clippy::expect_used)]
fn branch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Branch_at_(.+)_at_line_(\d{5,})_position_(-?\d+)_(true|false)Branch$")
            .expect("valid pattern")
    })
}
