//! Property-based tests for the crisis state tracker
//!
//! Invariants:
//! - Every counter stays within [0, 100] for any action sequence
//! - Severity always matches the derivation rule after any mutation
//! - Applying an action always marks it used

use chrono::Utc;
use proptest::prelude::*;

use crate::core::state::{CrisisState, Severity, ACTION_IMPACTS};

/// Any known action id, or an arbitrary unknown one.
fn arb_action() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0..ACTION_IMPACTS.len()).prop_map(|i| ACTION_IMPACTS[i].action.to_string()),
        1 => "[a-zA-Z ]{1,40}",
    ]
}

fn arb_action_sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_action(), 0..60)
}

proptest! {
    #[test]
    fn counters_stay_in_bounds(actions in arb_action_sequence()) {
        let mut state = CrisisState::new(Utc::now());
        for action in &actions {
            state.apply_action(action, Utc::now());
            prop_assert!((0..=100).contains(&state.public_trust));
            prop_assert!((0..=100).contains(&state.media_attention));
            prop_assert!((0..=100).contains(&state.internal_morale));
        }
    }

    #[test]
    fn severity_always_matches_derivation(actions in arb_action_sequence()) {
        let mut state = CrisisState::new(Utc::now());
        for action in &actions {
            state.apply_action(action, Utc::now());
            prop_assert_eq!(
                state.severity,
                CrisisState::derive_severity(state.public_trust, state.media_attention)
            );
        }
    }

    #[test]
    fn applied_actions_are_marked_used(actions in arb_action_sequence()) {
        let mut state = CrisisState::new(Utc::now());
        for action in &actions {
            state.apply_action(action, Utc::now());
            prop_assert!(state.used_actions.contains(action.as_str()));
        }
    }

    #[test]
    fn derivation_is_total(trust in -100i32..200, media in -100i32..200) {
        // Out-of-range inputs still classify without panicking.
        let severity = CrisisState::derive_severity(trust, media);
        prop_assert!(matches!(severity, Severity::Low | Severity::Medium | Severity::High));
    }
}
