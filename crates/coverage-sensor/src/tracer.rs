//! Execution Tracer
//!
//! The callbacks instrumented code invokes. Each call names its location
//! (class, line, position) and the registry turns it into objective scores.
//!
//! Careful when changing any signature here: already instrumented code calls
//! these methods by name and shape.
//!
//! # Example
//!
//! ```rust
//! use coverage_sensor::{ComparisonKind, ExecutionTracer};
//!
//! let tracer = ExecutionTracer::default();
//! tracer.reset();
//! tracer.executed_line("a.B", 10)?;
//! tracer.executing_method("a.B", 20, 0, true)?;
//! tracer.executing_branch_jump_value(0, ComparisonKind::Eq, "a.B", 30, 0)?;
//!
//! assert_eq!(tracer.registry().number_of_objectives(None), 4);
//! # Ok::<(), coverage_sensor::SensorError>(())
//! ```

use crate::config::SensorConfig;
use crate::heuristic::{ComparisonKind, JumpHeuristics, Truthness};
use crate::recorder::{BufferedRecorder, ObjectiveRecorder};
use crate::registry::ObjectiveRegistry;
use crate::result::SensorResult;
use std::sync::{Arc, OnceLock};

/// Entry point for instrumentation callbacks
///
/// Cheap to clone: clones share the same registry.
#[derive(Debug, Clone)]
pub struct ExecutionTracer {
    registry: Arc<ObjectiveRegistry>,
    heuristics: JumpHeuristics,
}

impl Default for ExecutionTracer {
    fn default() -> Self {
        Self {
            registry: Arc::new(ObjectiveRegistry::default()),
            heuristics: JumpHeuristics::default(),
        }
    }
}

impl ExecutionTracer {
    /// Create a tracer with its own registry
    pub fn new(config: &SensorConfig) -> SensorResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(ObjectiveRegistry::new(config)),
            heuristics: JumpHeuristics::new(config.reference_floor)?,
        })
    }

    /// Create a tracer whose registry forwards improvements to `recorder`
    pub fn with_recorder(
        config: &SensorConfig,
        recorder: Arc<dyn ObjectiveRecorder>,
    ) -> SensorResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(ObjectiveRegistry::with_recorder(config, recorder)),
            heuristics: JumpHeuristics::new(config.reference_floor)?,
        })
    }

    /// Create a tracer that forwards improvements into a session queue
    ///
    /// The queue holds `config.recorder_capacity` pending updates and drops
    /// the rest until drained.
    pub fn buffered(config: &SensorConfig) -> SensorResult<(Self, Arc<BufferedRecorder>)> {
        config.validate()?;
        let recorder = config.buffered_recorder();
        let tracer = Self::with_recorder(config, recorder.clone())?;
        Ok((tracer, recorder))
    }

    /// Create a tracer over an existing registry
    #[must_use]
    pub fn from_registry(registry: Arc<ObjectiveRegistry>, heuristics: JumpHeuristics) -> Self {
        Self {
            registry,
            heuristics,
        }
    }

    /// Process-wide tracer for instrumentation that cannot carry a handle
    ///
    /// Created with the default configuration on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ExecutionTracer> = OnceLock::new();
        GLOBAL.get_or_init(Self::default)
    }

    /// The registry this tracer writes to
    #[must_use]
    pub fn registry(&self) -> &Arc<ObjectiveRegistry> {
        &self.registry
    }

    /// The branch distance engine in use
    #[must_use]
    pub fn heuristics(&self) -> &JumpHeuristics {
        &self.heuristics
    }

    /// Clear all objectives before a new test execution
    pub fn reset(&self) {
        self.registry.reset();
    }

    /// Attribute subsequent updates to action `index`
    pub fn set_action_index(&self, index: i32) -> SensorResult<()> {
        self.registry
            .set_action_index(index)
            .inspect_err(|e| tracing::warn!(index, error = %e, "rejected action index"))
    }

    /// A line was executed
    pub fn executed_line(&self, class_name: &str, line: i32) -> SensorResult<()> {
        self.registry
            .record_line_reached(class_name, line)
            .inspect_err(|e| warn_rejected("executed_line", class_name, line, e))
    }

    /// The `index`-th call on a line returned (`completed`) or raised a failure
    pub fn executing_method(
        &self,
        class_name: &str,
        line: i32,
        index: i32,
        completed: bool,
    ) -> SensorResult<()> {
        self.registry
            .record_method_call_outcome(class_name, line, index, completed)
            .inspect_err(|e| warn_rejected("executing_method", class_name, line, e))
    }

    /// Branch on one integer compared against zero
    pub fn executing_branch_jump_value(
        &self,
        value: i32,
        kind: ComparisonKind,
        class_name: &str,
        line: i32,
        branch_id: i32,
    ) -> SensorResult<()> {
        let truthness = self.heuristics.for_single_value(i64::from(value), kind);
        self.branch(truthness, class_name, line, branch_id)
    }

    /// Branch on two integers
    pub fn executing_branch_jump_values(
        &self,
        first: i32,
        second: i32,
        kind: ComparisonKind,
        class_name: &str,
        line: i32,
        branch_id: i32,
    ) -> SensorResult<()> {
        let truthness =
            self.heuristics
                .for_value_comparison(i64::from(first), i64::from(second), kind);
        self.branch(truthness, class_name, line, branch_id)
    }

    /// Branch on the identity of two references
    pub fn executing_branch_jump_refs<T: ?Sized>(
        &self,
        first: Option<&T>,
        second: Option<&T>,
        kind: ComparisonKind,
        class_name: &str,
        line: i32,
        branch_id: i32,
    ) -> SensorResult<()> {
        let truthness = self.heuristics.for_reference_comparison(first, second, kind);
        self.branch(truthness, class_name, line, branch_id)
    }

    /// Branch on whether a reference is present
    pub fn executing_branch_jump_null<T: ?Sized>(
        &self,
        value: Option<&T>,
        kind: ComparisonKind,
        class_name: &str,
        line: i32,
        branch_id: i32,
    ) -> SensorResult<()> {
        let truthness = self.heuristics.for_null_check(value, kind);
        self.branch(truthness, class_name, line, branch_id)
    }

    fn branch(
        &self,
        truthness: SensorResult<Truthness>,
        class_name: &str,
        line: i32,
        branch_id: i32,
    ) -> SensorResult<()> {
        truthness
            .and_then(|t| {
                self.registry
                    .record_branch_outcome(class_name, line, branch_id, t)
            })
            .inspect_err(|e| warn_rejected("executing_branch_jump", class_name, line, e))
    }
}

fn warn_rejected(callback: &str, class_name: &str, line: i32, error: &crate::SensorError) {
    tracing::warn!(callback, class_name, line, %error, "rejected instrumentation callback");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::heuristic::opcode;
    use crate::SensorError;

    #[test]
    fn test_new_validates_config() {
        let mut config = SensorConfig::default();
        config.reference_floor = 2.0;
        assert!(ExecutionTracer::new(&config).is_err());
    }

    #[test]
    fn test_buffered_queue_bounded_by_config() {
        let config = SensorConfig::builder().recorder_capacity(4).build().unwrap();
        let (tracer, recorder) = ExecutionTracer::buffered(&config).unwrap();
        for line in 0..100 {
            tracer.executed_line("a.B", line).unwrap();
        }
        assert_eq!(tracer.registry().len(), 100);
        assert_eq!(recorder.capacity(), 4);
        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.dropped(), 96);
    }

    #[test]
    fn test_global_is_one_instance() {
        let first = ExecutionTracer::global();
        let second = ExecutionTracer::global();
        assert!(std::ptr::eq(first, second));
        assert!(Arc::ptr_eq(first.registry(), second.registry()));
    }

    #[test]
    fn test_clones_share_registry() {
        let tracer = ExecutionTracer::default();
        let other = tracer.clone();
        other.executed_line("a.B", 1).unwrap();
        assert_eq!(tracer.registry().len(), 1);
    }

    #[test]
    fn test_two_value_jump() {
        let tracer = ExecutionTracer::default();
        tracer
            .executing_branch_jump_values(3, 7, ComparisonKind::Lt, "a.B", 5, 1)
            .unwrap();
        let registry = tracer.registry();
        assert_eq!(
            registry
                .value("Branch_at_a.B_at_line_00005_position_1_trueBranch")
                .unwrap(),
            1.0
        );
        assert_eq!(
            registry
                .value("Branch_at_a.B_at_line_00005_position_1_falseBranch")
                .unwrap(),
            0.2
        );
    }

    #[test]
    fn test_reference_jumps() {
        let tracer = ExecutionTracer::default();
        let a = vec![1_u8];
        tracer
            .executing_branch_jump_refs(Some(&a), Some(&a), ComparisonKind::RefEq, "a.B", 6, 0)
            .unwrap();
        tracer
            .executing_branch_jump_null::<Vec<u8>>(None, ComparisonKind::NonNull, "a.B", 7, 0)
            .unwrap();

        let uncovered = tracer.registry().non_covered_objectives(Some("Branch"));
        let uncovered: Vec<_> = uncovered.iter().map(|id| id.as_str()).collect();
        assert_eq!(
            uncovered,
            vec![
                "Branch_at_a.B_at_line_00006_position_0_falseBranch",
                "Branch_at_a.B_at_line_00007_position_0_trueBranch",
            ]
        );
    }

    #[test]
    fn test_opcode_from_instrumentation() {
        let tracer = ExecutionTracer::default();
        // `if (x > 0)` compiles to IFLE jumping over the then-block
        let kind = ComparisonKind::from_jump_over(opcode::IFLE).unwrap();
        tracer
            .executing_branch_jump_value(5, kind, "a.B", 8, 0)
            .unwrap();
        assert_eq!(
            tracer
                .registry()
                .value("Branch_at_a.B_at_line_00008_position_0_trueBranch")
                .unwrap(),
            1.0
        );
    }

    #[test]
    fn test_wrong_shape_rejected_without_mutation() {
        let tracer = ExecutionTracer::default();
        let err = tracer
            .executing_branch_jump_value(1, ComparisonKind::IsNull, "a.B", 9, 0)
            .unwrap_err();
        assert!(matches!(err, SensorError::UnsupportedComparison { .. }));
        assert!(tracer.registry().is_empty());
    }

    #[test]
    fn test_negative_action_index() {
        let tracer = ExecutionTracer::default();
        assert!(tracer.set_action_index(-3).is_err());
        tracer.set_action_index(3).unwrap();
        assert_eq!(tracer.registry().action_index(), 3);
    }
}
