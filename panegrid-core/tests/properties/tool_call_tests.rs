//! Property-based tests for incremental tool-call merging

use panegrid_core::chat::{ToolCall, ToolCallDelta, ToolStatus, merge_tool_call};
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

fn status_strategy() -> impl Strategy<Value = Option<ToolStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(ToolStatus::Running)),
        Just(Some(ToolStatus::Complete)),
        Just(Some(ToolStatus::Error)),
    ]
}

fn delta_strategy() -> impl Strategy<Value = ToolCallDelta> {
    (
        proptest::option::of(prop_oneof![Just("c1"), Just("c2"), Just("")]),
        proptest::option::of(prop_oneof![Just("search"), Just("read"), Just("")]),
        proptest::option::of(prop_oneof![Just(""), Just("{}"), Just("{\"q\":\"rust\"}")]),
        status_strategy(),
    )
        .prop_map(|(id, name, arguments, status)| ToolCallDelta {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
            arguments: arguments.map(str::to_string),
            status,
            result_preview: None,
        })
}

fn merge_all(deltas: &[ToolCallDelta]) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    for delta in deltas {
        merge_tool_call(&mut calls, delta.clone());
    }
    calls
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Once a call has non-empty arguments, later deltas never clear them.
    #[test]
    fn arguments_never_become_empty(
        deltas in proptest::collection::vec(delta_strategy(), 1..30),
    ) {
        let mut calls: Vec<ToolCall> = Vec::new();
        for delta in deltas {
            let before: Vec<bool> = calls.iter().map(|call| !call.arguments.is_empty()).collect();
            merge_tool_call(&mut calls, delta);
            for (index, had_arguments) in before.iter().enumerate() {
                if *had_arguments {
                    prop_assert!(!calls[index].arguments.is_empty());
                }
            }
        }
    }

    /// A finished call never goes back to running.
    #[test]
    fn terminal_status_is_sticky(
        deltas in proptest::collection::vec(delta_strategy(), 1..30),
    ) {
        let mut calls: Vec<ToolCall> = Vec::new();
        for delta in deltas {
            let finished: Vec<bool> = calls.iter().map(|call| call.status.is_terminal()).collect();
            merge_tool_call(&mut calls, delta);
            for (index, was_finished) in finished.iter().enumerate() {
                if *was_finished {
                    prop_assert!(calls[index].status.is_terminal());
                }
            }
        }
    }

    /// Merging never removes calls and adds at most one per delta.
    #[test]
    fn call_count_grows_by_at_most_one(
        deltas in proptest::collection::vec(delta_strategy(), 1..30),
    ) {
        let mut calls: Vec<ToolCall> = Vec::new();
        for delta in deltas {
            let before = calls.len();
            let anonymous = delta.id.as_deref().is_none_or(str::is_empty)
                && delta.name.as_deref().is_none_or(str::is_empty);
            let result = merge_tool_call(&mut calls, delta);
            prop_assert!(calls.len() == before || calls.len() == before + 1);
            if anonymous {
                prop_assert_eq!(result, None);
                prop_assert_eq!(calls.len(), before);
            }
        }
    }

    /// Repeating an id-carrying delta is idempotent.
    #[test]
    fn repeated_delta_with_id_is_idempotent(
        prefix in proptest::collection::vec(delta_strategy(), 0..10),
        arguments in prop_oneof![Just("{}"), Just("{\"a\":1}")],
    ) {
        let delta = ToolCallDelta {
            id: Some("fixed".to_string()),
            name: Some("lookup".to_string()),
            arguments: Some(arguments.to_string()),
            status: Some(ToolStatus::Complete),
            result_preview: None,
        };
        let mut once = merge_all(&prefix);
        merge_tool_call(&mut once, delta.clone());
        let mut twice = once.clone();
        merge_tool_call(&mut twice, delta);
        prop_assert_eq!(once, twice);
    }
}
