//! Coverage Sensor: runtime fitness feedback for search-based test generation
//!
//! Instrumented code calls into this crate at every executed line, call site
//! and branch. Instead of a plain covered / not-covered bit, each coverage
//! objective gets a score in [0,1] telling how close execution came to
//! satisfying it, so a search algorithm has a gradient to climb.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                  COVERAGE SENSOR Architecture                     │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  instrumented code                                                │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  ExecutionTracer ──► JumpHeuristics ──► Truthness                 │
//! │        │                                    │                     │
//! │        ▼                                    ▼                     │
//! │  ObjectiveId ────────────────────► ObjectiveRegistry ──► snapshot │
//! │                                             │                     │
//! │                                             ▼                     │
//! │                                    ObjectiveRecorder (session)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use coverage_sensor::{ComparisonKind, ExecutionTracer};
//!
//! let tracer = ExecutionTracer::default();
//! tracer.reset();
//! tracer.set_action_index(0)?;
//! tracer.executing_branch_jump_values(7, 10, ComparisonKind::Eq, "org.foo.Bar", 42, 0)?;
//!
//! let snapshot = tracer.registry().snapshot();
//! let on_true = snapshot
//!     .get("Branch_at_org.foo.Bar_at_line_00042_position_0_trueBranch")
//!     .map(|r| r.value);
//! assert_eq!(on_true, Some(0.25));
//! # Ok::<(), coverage_sensor::SensorError>(())
//! ```

#![cfg_attr(test, allow(clippy::float_cmp))]

/// Sensor configuration (YAML or builder)
pub mod config;

/// Branch distance heuristics
pub mod heuristic;

/// Objective identifiers and records
pub mod objective;

/// Session-wide forwarding of improvements
pub mod recorder;

/// Best-so-far objective registry
pub mod registry;

mod result;

/// `tracing-subscriber` setup
#[cfg(feature = "telemetry")]
pub mod telemetry;

mod tracer;

pub use config::{SensorConfig, SensorConfigBuilder, TelemetryConfig};
pub use heuristic::{ComparisonKind, JumpHeuristics, OperandShape, Truthness};
pub use objective::{ObjectiveId, ObjectiveKind, ObjectiveRecord, Polarity};
pub use recorder::{BufferedRecorder, NoopRecorder, ObjectiveRecorder, ObjectiveUpdate};
pub use registry::{ObjectiveRegistry, ObjectiveSnapshot, ObjectiveSummary};
pub use result::{SensorError, SensorResult};
pub use tracer::ExecutionTracer;
