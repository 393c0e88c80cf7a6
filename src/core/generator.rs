//! Dynamic Event Generator
//!
//! Turns the current crisis state (and optionally a fresh decision) into new
//! timeline events, with text from a [`NarrativeBackend`]. Backend failures
//! never surface: every generation path has a canned fallback, so the event
//! log keeps moving.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;

use crate::core::events::{CrisisEvent, EventKind};
use crate::core::llm::narrative::{
    DecisionAnalysis, DecisionAnalysisRequest, NarrativeBackend, NewsArticleRequest,
    StakeholderUpdateRequest, Tone,
};
use crate::core::scenario::Scenario;
use crate::core::stakeholder::Sentiment;
use crate::core::state::{CrisisState, Severity};

/// Chance of a spontaneous update on an ordinary generation pass.
const SPONTANEOUS_UPDATE_CHANCE: f64 = 0.3;

/// Trust level below which coverage turns critical and moods turn sour.
const LOW_TRUST_THRESHOLD: i32 = 50;

/// At most this many stakeholder-reaction events per analyzed decision.
const MAX_REACTION_EVENTS: usize = 3;

/// Kinds a spontaneous update can take, drawn uniformly.
const UPDATE_KINDS: &[EventKind] = &[
    EventKind::Media,
    EventKind::Stakeholder,
    EventKind::Internal,
    EventKind::Government,
];

pub struct EventGenerator {
    backend: Arc<dyn NarrativeBackend>,
}

impl EventGenerator {
    pub fn new(backend: Arc<dyn NarrativeBackend>) -> Self {
        Self { backend }
    }

    /// How many spontaneous updates this pass produces. A time skip forces a
    /// burst (4 when severity is high, else 3); otherwise at most one,
    /// with probability [`SPONTANEOUS_UPDATE_CHANCE`].
    pub fn update_count<R: Rng>(severity: Severity, time_skipped: bool, rng: &mut R) -> usize {
        if time_skipped {
            if severity == Severity::High {
                4
            } else {
                3
            }
        } else if rng.gen::<f64>() < SPONTANEOUS_UPDATE_CHANCE {
            1
        } else {
            0
        }
    }

    /// Generate the next batch of events. `decision` is the Decision event a
    /// trainee just produced, if any; its analysis yields a Consequence event
    /// threaded to it plus up to [`MAX_REACTION_EVENTS`] stakeholder
    /// reactions. Timestamps carry small increasing offsets so the batch
    /// appends in a stable order.
    pub async fn generate_updates<R: Rng + Send>(
        &self,
        decision: Option<&CrisisEvent>,
        state: &CrisisState,
        past_events: &[CrisisEvent],
        scenario: &Scenario,
        time_skipped: bool,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Vec<CrisisEvent> {
        // All randomness is drawn before the first await.
        let count = Self::update_count(state.severity, time_skipped, rng);
        let kinds: Vec<EventKind> = (0..count)
            .map(|_| UPDATE_KINDS[rng.gen_range(0..UPDATE_KINDS.len())])
            .collect();

        let recent: Vec<String> = past_events
            .iter()
            .rev()
            .take(3)
            .map(|e| e.content.clone())
            .collect();

        let mut batch: Vec<CrisisEvent> = Vec::new();

        if let Some(decision_event) = decision {
            let analysis = self.analyze(decision_event, state, past_events).await;
            let at = now + Duration::milliseconds(batch.len() as i64 * 10);
            batch.push(
                CrisisEvent::new(EventKind::Consequence, analysis.narrative, at)
                    .with_parent(decision_event.id)
                    .with_severity(state.severity),
            );
            for reaction in analysis.reactions.into_iter().take(MAX_REACTION_EVENTS) {
                let at = now + Duration::milliseconds(batch.len() as i64 * 10);
                batch.push(
                    CrisisEvent::new(
                        EventKind::Stakeholder,
                        format!("{}: {}", reaction.stakeholder, reaction.reaction),
                        at,
                    )
                    .with_parent(decision_event.id)
                    .with_severity(state.severity),
                );
            }
        }

        for kind in kinds {
            let at = now + Duration::milliseconds(batch.len() as i64 * 10);
            let event = match kind {
                EventKind::Media => {
                    let content = self.news_article(state, scenario, &recent).await;
                    // Breaking coverage always lands hard.
                    CrisisEvent::new(EventKind::Media, content, at).with_severity(Severity::High)
                }
                other => {
                    let content = self.stakeholder_update(state, &recent).await;
                    CrisisEvent::new(other, content, at).with_severity(state.severity)
                }
            };
            batch.push(event);
        }

        batch
    }

    async fn news_article(
        &self,
        state: &CrisisState,
        scenario: &Scenario,
        recent: &[String],
    ) -> String {
        let tone = if state.public_trust < LOW_TRUST_THRESHOLD {
            Tone::Critical
        } else {
            Tone::Neutral
        };
        let request = NewsArticleRequest {
            headline: headline(&scenario.theme, state.severity),
            context: recent.to_vec(),
            tone,
        };
        match self.backend.news_article(&request).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("News article generation failed, using fallback: {e}");
                format!(
                    "Coverage of the {} situation continues as outlets press for details.",
                    scenario.theme
                )
            }
        }
    }

    async fn stakeholder_update(&self, state: &CrisisState, recent: &[String]) -> String {
        let request = StakeholderUpdateRequest {
            severity: state.severity,
            recent: recent.to_vec(),
        };
        match self.backend.stakeholder_update(&request).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Stakeholder update generation failed, using fallback: {e}");
                "Teams on the ground report the situation is still developing.".to_string()
            }
        }
    }

    async fn analyze(
        &self,
        decision_event: &CrisisEvent,
        state: &CrisisState,
        past_events: &[CrisisEvent],
    ) -> DecisionAnalysis {
        let past_decisions: Vec<String> = past_events
            .iter()
            .filter(|e| e.kind == EventKind::Decision && e.id != decision_event.id)
            .map(|e| e.content.clone())
            .collect();
        let mood = if state.public_trust < LOW_TRUST_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        let request = DecisionAnalysisRequest {
            decision: decision_event.content.clone(),
            past_decisions,
            severity: state.severity,
            stakeholder_mood: mood,
        };
        match self.backend.analyze_decision(&request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("Decision analysis failed, using fallback: {e}");
                DecisionAnalysis::fallback()
            }
        }
    }
}

fn headline(theme: &str, severity: Severity) -> String {
    match severity {
        Severity::High => format!("{theme}: crisis deepens as pressure mounts"),
        Severity::Medium => format!("{theme}: questions multiply as response takes shape"),
        Severity::Low => format!("{theme}: organisation responds to emerging reports"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::narrative::CannedNarrativeBackend;
    use crate::core::llm::types::{LLMError, Result as LlmResult};
    use crate::core::scenario::catalog;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingBackend;

    #[async_trait]
    impl NarrativeBackend for FailingBackend {
        async fn news_article(&self, _: &NewsArticleRequest) -> LlmResult<String> {
            Err(LLMError::InvalidResponse("boom".to_string()))
        }

        async fn stakeholder_update(&self, _: &StakeholderUpdateRequest) -> LlmResult<String> {
            Err(LLMError::InvalidResponse("boom".to_string()))
        }

        async fn analyze_decision(
            &self,
            _: &DecisionAnalysisRequest,
        ) -> LlmResult<DecisionAnalysis> {
            Err(LLMError::InvalidResponse("boom".to_string()))
        }
    }

    fn generator() -> EventGenerator {
        EventGenerator::new(Arc::new(CannedNarrativeBackend))
    }

    #[test]
    fn test_update_count_skip_burst() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            EventGenerator::update_count(Severity::High, true, &mut rng),
            4
        );
        assert_eq!(
            EventGenerator::update_count(Severity::Low, true, &mut rng),
            3
        );
        assert_eq!(
            EventGenerator::update_count(Severity::Medium, true, &mut rng),
            3
        );
    }

    #[test]
    fn test_update_count_ordinary_pass_is_zero_or_one() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let n = EventGenerator::update_count(Severity::High, false, &mut rng);
            assert!(n <= 1);
        }
    }

    #[tokio::test]
    async fn test_ordinary_pass_yields_at_most_one_event() {
        let gen = generator();
        let scenario = catalog::data_breach();
        let now = Utc::now();
        let state = CrisisState::new(now);
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = gen
                .generate_updates(None, &state, &[], &scenario, false, &mut rng, now)
                .await;
            assert!(batch.len() <= 1, "seed {seed}: got {}", batch.len());
        }
    }

    #[tokio::test]
    async fn test_decision_produces_threaded_consequence() {
        let gen = generator();
        let scenario = catalog::data_breach();
        let now = Utc::now();
        let state = CrisisState::new(now);
        let decision = CrisisEvent::new(EventKind::Decision, "Issue a public statement", now);
        let mut rng = StdRng::seed_from_u64(3);

        let batch = gen
            .generate_updates(
                Some(&decision),
                &state,
                &[decision.clone()],
                &scenario,
                false,
                &mut rng,
                now,
            )
            .await;

        let consequence = batch
            .iter()
            .find(|e| e.kind == EventKind::Consequence)
            .expect("decision yields a consequence");
        assert_eq!(consequence.parent_event_id, Some(decision.id));
        // Reactions, if any, are also threaded.
        for reaction in batch.iter().filter(|e| e.kind == EventKind::Stakeholder) {
            assert_eq!(reaction.parent_event_id, Some(decision.id));
        }
    }

    #[tokio::test]
    async fn test_time_skip_media_events_are_high_severity() {
        let gen = generator();
        let scenario = catalog::data_breach();
        let now = Utc::now();
        let state = CrisisState::new(now);
        let mut rng = StdRng::seed_from_u64(11);

        let batch = gen
            .generate_updates(None, &state, &[], &scenario, true, &mut rng, now)
            .await;
        assert_eq!(batch.len(), 3);
        for event in &batch {
            if event.kind == EventKind::Media {
                assert_eq!(event.severity, Some(Severity::High));
            } else {
                assert_eq!(event.severity, Some(Severity::Low));
            }
        }
    }

    #[tokio::test]
    async fn test_batch_timestamps_strictly_increase() {
        let gen = generator();
        let scenario = catalog::data_breach();
        let now = Utc::now();
        let state = CrisisState::new(now);
        let decision = CrisisEvent::new(EventKind::Decision, "Hold a press conference", now);
        let mut rng = StdRng::seed_from_u64(5);

        let batch = gen
            .generate_updates(Some(&decision), &state, &[], &scenario, true, &mut rng, now)
            .await;
        for pair in batch.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_canned_text() {
        let gen = EventGenerator::new(Arc::new(FailingBackend));
        let scenario = catalog::data_breach();
        let now = Utc::now();
        let state = CrisisState::new(now);
        let decision = CrisisEvent::new(EventKind::Decision, "Engage legal counsel", now);
        let mut rng = StdRng::seed_from_u64(9);

        let batch = gen
            .generate_updates(Some(&decision), &state, &[], &scenario, true, &mut rng, now)
            .await;
        // Consequence fallback plus the full skip burst, no errors.
        assert!(batch.len() >= 4);
        assert!(batch
            .iter()
            .any(|e| e.content.contains("acknowledged")));
        assert!(batch.iter().all(|e| !e.content.is_empty()));
    }
}
