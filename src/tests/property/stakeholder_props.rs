//! Property-based tests for the stakeholder memory store
//!
//! Invariants:
//! - History is append-only and matches the interaction count
//! - A decline always blocks contact immediately afterwards
//! - Sentiment classification is deterministic and case-insensitive

use chrono::Utc;
use proptest::prelude::*;

use crate::core::stakeholder::{
    classify_sentiment, Interaction, InteractionKind, StakeholderStore,
};
use crate::core::state::Severity;

fn arb_response() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.]{1,120}",
        Just("We will resolve and support everyone affected".to_string()),
        Just("We deny it and blame the vendor".to_string()),
        Just("Quarterly report attached".to_string()),
    ]
}

proptest! {
    #[test]
    fn history_length_tracks_interaction_count(responses in prop::collection::vec(arb_response(), 1..30)) {
        let mut store = StakeholderStore::new();
        let now = Utc::now();
        for response in &responses {
            store.record_interaction(
                "Partner",
                Interaction::response(InteractionKind::Message, response.clone()),
                Severity::Low,
                now,
            );
        }
        let memory = store.memory("Partner").unwrap();
        prop_assert_eq!(memory.history.len(), responses.len());
        prop_assert_eq!(memory.interaction_count as usize, responses.len());
    }

    #[test]
    fn decline_always_blocks_immediate_contact(prior in prop::collection::vec(arb_response(), 0..5)) {
        let mut store = StakeholderStore::new();
        let now = Utc::now();
        for response in &prior {
            store.record_interaction(
                "Press",
                Interaction::response(InteractionKind::Message, response.clone()),
                Severity::Low,
                now,
            );
        }
        store.record_interaction(
            "Press",
            Interaction::declined(InteractionKind::Call),
            Severity::Low,
            now,
        );
        prop_assert!(!store.should_contact("Press", now));
    }

    #[test]
    fn sentiment_is_case_insensitive(response in arb_response()) {
        prop_assert_eq!(
            classify_sentiment(&response),
            classify_sentiment(&response.to_uppercase())
        );
    }
}
