//! Tests for the objective registry

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use super::*;
use crate::recorder::BufferedRecorder;

fn registry() -> ObjectiveRegistry {
    ObjectiveRegistry::new(&SensorConfig::builder().shard_count(4).build().unwrap())
}

fn recording_registry(capacity: usize) -> (ObjectiveRegistry, Arc<BufferedRecorder>) {
    let recorder = Arc::new(BufferedRecorder::new(capacity));
    let registry = ObjectiveRegistry::with_recorder(&SensorConfig::default(), recorder.clone());
    (registry, recorder)
}

mod merge_rule_tests {
    use super::*;

    #[test]
    fn test_line_reached_is_idempotent() {
        let registry = registry();
        for _ in 0..10 {
            registry.record_line_reached("a.B", 10).unwrap();
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.value("Line_at_a.B_00010").unwrap(), 1.0);
    }

    #[test]
    fn test_failed_call_does_not_overwrite_success() {
        let registry = registry();
        registry.record_method_call_outcome("a.B", 20, 0, true).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();
        assert_eq!(registry.value("Success_Call_at_a.B_00020_0").unwrap(), 1.0);
    }

    #[test]
    fn test_success_after_failure_improves() {
        let registry = registry();
        registry.record_method_call_outcome("a.B", 20, 1, false).unwrap();
        assert_eq!(registry.value("Success_Call_at_a.B_00020_1").unwrap(), 0.5);
        registry.record_method_call_outcome("a.B", 20, 1, true).unwrap();
        assert_eq!(registry.value("Success_Call_at_a.B_00020_1").unwrap(), 1.0);
    }

    #[test]
    fn test_values_never_decrease() {
        let registry = registry();
        let id = ObjectiveId::line("a.B", 1).unwrap();
        let mut stored = Vec::new();
        for value in [0.2, 0.6, 0.1, 0.6, 0.9, 0.0] {
            let _ = registry.update_objective(&id, value).unwrap();
            stored.push(registry.value(id.as_str()).unwrap());
        }
        assert_eq!(stored, vec![0.2, 0.6, 0.6, 0.6, 0.9, 0.9]);
    }

    #[test]
    fn test_update_reports_change() {
        let registry = registry();
        let id = ObjectiveId::line("a.B", 1).unwrap();
        assert!(registry.update_objective(&id, 0.4).unwrap());
        assert!(!registry.update_objective(&id, 0.4).unwrap());
        assert!(!registry.update_objective(&id, 0.3).unwrap());
        assert!(registry.update_objective(&id, 0.5).unwrap());
    }

    #[test]
    fn test_first_update_inserts_zero() {
        let registry = registry();
        let id = ObjectiveId::line("a.B", 1).unwrap();
        assert!(registry.update_objective(&id, 0.0).unwrap());
        assert_eq!(registry.value(id.as_str()).unwrap(), 0.0);
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_unvalidated_oversized_config_does_not_panic() {
        let config = SensorConfig {
            shard_count: usize::MAX,
            initial_capacity: usize::MAX,
            ..SensorConfig::default()
        };
        assert!(config.validate().is_err());

        let registry = ObjectiveRegistry::new(&config);
        registry.record_line_reached("a.B", 1).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_out_of_range_rejected_without_mutation() {
        let registry = registry();
        let id = ObjectiveId::line("a.B", 1).unwrap();
        let _ = registry.update_objective(&id, 0.3).unwrap();

        for bad in [-0.1, 1.1, f64::NAN] {
            let err = registry.update_objective(&id, bad).unwrap_err();
            assert!(matches!(err, SensorError::InvalidArgument { .. }));
        }
        assert_eq!(registry.value(id.as_str()).unwrap(), 0.3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rejected_value_does_not_insert() {
        let registry = registry();
        let id = ObjectiveId::line("a.B", 1).unwrap();
        assert!(registry.update_objective(&id, 1.1).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_negative_line_rejected() {
        let registry = registry();
        assert!(registry.record_line_reached("a.B", -1).is_err());
        assert!(registry.record_method_call_outcome("a.B", -1, 0, true).is_err());
        let t = Truthness::new(1.0, 0.5).unwrap();
        assert!(registry.record_branch_outcome("a.B", -1, 0, t).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_negative_action_index_rejected() {
        let registry = registry();
        registry.set_action_index(4).unwrap();
        assert!(registry.set_action_index(-1).is_err());
        assert_eq!(registry.action_index(), 4);
    }

    #[test]
    fn test_value_of_unknown_id() {
        let registry = registry();
        let err = registry.value("Line_at_a.B_00001").unwrap_err();
        assert!(matches!(err, SensorError::NotFound { .. }));
    }
}

mod branch_tests {
    use super::*;

    #[test]
    fn test_branch_creates_two_objectives() {
        let registry = registry();
        let t = Truthness::new(1.0, 0.5).unwrap();
        registry.record_branch_outcome("a.B", 30, 0, t).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry
                .value("Branch_at_a.B_at_line_00030_position_0_trueBranch")
                .unwrap(),
            1.0
        );
        assert_eq!(
            registry
                .value("Branch_at_a.B_at_line_00030_position_0_falseBranch")
                .unwrap(),
            0.5
        );
    }

    #[test]
    fn test_branch_sides_improve_independently() {
        let registry = registry();
        registry
            .record_branch_outcome("a.B", 30, 0, Truthness::new(1.0, 0.2).unwrap())
            .unwrap();
        registry
            .record_branch_outcome("a.B", 30, 0, Truthness::new(0.1, 1.0).unwrap())
            .unwrap();

        assert_eq!(registry.number_of_non_covered_objectives(Some("Branch")), 0);
        assert_eq!(registry.covered_count(Some("Branch")), 2);
    }
}

mod query_tests {
    use super::*;

    fn populated() -> ObjectiveRegistry {
        let registry = registry();
        registry.record_line_reached("a.B", 10).unwrap();
        registry.record_line_reached("a.B", 11).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();
        registry
            .record_branch_outcome("a.B", 30, 0, Truthness::new(1.0, 0.5).unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn test_counts_by_prefix() {
        let registry = populated();
        assert_eq!(registry.number_of_objectives(None), 5);
        assert_eq!(registry.number_of_objectives(Some("")), 5);
        assert_eq!(registry.number_of_objectives(Some("Line")), 2);
        assert_eq!(registry.number_of_objectives(Some("Branch")), 2);
        assert_eq!(registry.number_of_objectives(Some("Success_Call")), 1);
    }

    #[test]
    fn test_non_covered() {
        let registry = populated();
        assert_eq!(registry.number_of_non_covered_objectives(None), 2);
        assert_eq!(registry.number_of_non_covered_objectives(Some("Line")), 0);

        let ids: Vec<_> = registry
            .non_covered_objectives(None)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            ids,
            vec![
                "Branch_at_a.B_at_line_00030_position_0_falseBranch",
                "Success_Call_at_a.B_00020_0",
            ]
        );
        assert_eq!(registry.covered_count(None), 3);
    }

    #[test]
    fn test_record_carries_action_index() {
        let registry = registry();
        registry.set_action_index(2).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();
        registry.set_action_index(3).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();

        // not improved, attribution stays with the first action
        let record = registry.record("Success_Call_at_a.B_00020_0").unwrap();
        assert_eq!(record.action_index, 2);

        registry.record_method_call_outcome("a.B", 20, 0, true).unwrap();
        let record = registry.record("Success_Call_at_a.B_00020_0").unwrap();
        assert_eq!(record.action_index, 3);
    }

    #[test]
    fn test_snapshot() {
        let snapshot = populated().snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.records()[0].id.kind(), crate::ObjectiveKind::Branch);
        assert_eq!(snapshot.non_covered(Some("Success_Call")).len(), 1);
    }
}

mod reset_tests {
    use super::*;

    #[test]
    fn test_reset_clears_everything() {
        let registry = registry();
        registry.set_action_index(5).unwrap();
        registry.record_line_reached("a.B", 10).unwrap();
        registry.reset();

        assert_eq!(registry.len(), 0);
        assert_eq!(registry.action_index(), 0);
        assert!(registry.value("Line_at_a.B_00010").is_err());
        assert!(registry.non_covered_objectives(None).is_empty());
    }

    #[test]
    fn test_values_restart_after_reset() {
        let registry = registry();
        registry.record_method_call_outcome("a.B", 20, 0, true).unwrap();
        registry.reset();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();
        assert_eq!(registry.value("Success_Call_at_a.B_00020_0").unwrap(), 0.5);
    }
}

mod recorder_tests {
    use super::*;

    #[test]
    fn test_only_changes_are_forwarded() {
        let (registry, recorder) = recording_registry(16);
        registry.set_action_index(1).unwrap();
        registry.record_line_reached("a.B", 10).unwrap();
        registry.record_line_reached("a.B", 10).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, false).unwrap();
        registry.record_method_call_outcome("a.B", 20, 0, true).unwrap();

        let updates = recorder.drain();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].id.as_str(), "Line_at_a.B_00010");
        assert_eq!(updates[0].action_index, 1);
        assert_eq!(updates[2].value, 1.0);
    }

    #[test]
    fn test_rejected_updates_not_forwarded() {
        let (registry, recorder) = recording_registry(16);
        let id = ObjectiveId::line("a.B", 1).unwrap();
        assert!(registry.update_objective(&id, 2.0).is_err());
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_full_recorder_does_not_fail_updates() {
        let (registry, recorder) = recording_registry(1);
        for line in 0..10 {
            registry.record_line_reached("a.B", line).unwrap();
        }
        assert_eq!(registry.len(), 10);
        assert_eq!(recorder.dropped(), 9);
    }
}
