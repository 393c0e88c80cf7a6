//! Exercise Orchestrator
//!
//! The session state machine: Setup, Running, Ended. Owns everything a live
//! exercise needs — crisis state, stakeholder store, event log, message
//! center, timeline, clock, RNG — and routes trainee decisions, time skips,
//! and message responses through the generator and the trigger policy.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::clock::Clock;
use crate::core::escalation;
use crate::core::events::{
    Channel, CrisisEvent, EventKind, StakeholderMessage, TimeBasedEvent, Urgency,
};
use crate::core::generator::EventGenerator;
use crate::core::llm::narrative::NarrativeBackend;
use crate::core::messages::MessageCenter;
use crate::core::scenario::{Scenario, ValidationError};
use crate::core::stakeholder::{Interaction, InteractionKind, StakeholderStore};
use crate::core::state::CrisisState;
use crate::core::timeline::TimelineScheduler;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ExerciseError {
    #[error("Exercise has not started yet")]
    NotStarted,

    #[error("Exercise has already ended")]
    AlreadyEnded,

    #[error("Unknown decision option: {0}")]
    UnknownOption(String),

    #[error("Unknown message: {0}")]
    UnknownMessage(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ExerciseError>;

// ============================================================================
// Phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExercisePhase {
    Setup,
    Running,
    /// Terminal. No decisions, skips, or message responses are accepted.
    Ended,
}

impl ExercisePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExercisePhase::Setup => "setup",
            ExercisePhase::Running => "running",
            ExercisePhase::Ended => "ended",
        }
    }
}

/// What a tick surfaced: new log events, messages auto-dismissed, and
/// whether the countdown just expired.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub events: Vec<CrisisEvent>,
    pub expired_messages: Vec<StakeholderMessage>,
    pub ended: bool,
}

// ============================================================================
// Session
// ============================================================================

pub struct ExerciseSession {
    phase: ExercisePhase,
    scenario: Arc<Scenario>,
    current_step: String,
    state: CrisisState,
    stakeholders: StakeholderStore,
    events: Vec<CrisisEvent>,
    messages: MessageCenter,
    timeline: TimelineScheduler,
    generator: Arc<EventGenerator>,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    duration: Duration,
    ends_at: Option<DateTime<Utc>>,
}

impl ExerciseSession {
    pub fn new(
        scenario: Scenario,
        backend: Arc<dyn NarrativeBackend>,
        clock: Arc<dyn Clock>,
        duration: Duration,
    ) -> Self {
        let now = clock.now();
        let scenario = Arc::new(scenario);
        let generator = Arc::new(EventGenerator::new(backend));
        let current_step = scenario
            .first_step()
            .map(|s| s.id.clone())
            .unwrap_or_default();
        Self {
            phase: ExercisePhase::Setup,
            current_step,
            state: CrisisState::new(now),
            stakeholders: StakeholderStore::new(),
            events: Vec::new(),
            messages: MessageCenter::new(),
            timeline: TimelineScheduler::new(now, generator.clone(), scenario.clone()),
            scenario,
            generator,
            clock,
            rng: StdRng::from_entropy(),
            duration,
            ends_at: None,
        }
    }

    /// Fix the RNG seed, for reproducible sessions in tests and demos.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== accessors =====

    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn current_step(&self) -> Option<&crate::core::scenario::ScenarioStep> {
        self.scenario.step(&self.current_step)
    }

    pub fn state(&self) -> &CrisisState {
        &self.state
    }

    pub fn stakeholders(&self) -> &StakeholderStore {
        &self.stakeholders
    }

    pub fn events(&self) -> &[CrisisEvent] {
        &self.events
    }

    pub fn messages(&self) -> &MessageCenter {
        &self.messages
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.ends_at.map(|at| at - self.clock.now())
    }

    // ===== lifecycle =====

    /// Setup -> Running. Stamps the countdown and logs the inbrief.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            ExercisePhase::Setup => {}
            ExercisePhase::Running => return Ok(()),
            ExercisePhase::Ended => return Err(ExerciseError::AlreadyEnded),
        }

        let now = self.clock.now();
        self.phase = ExercisePhase::Running;
        self.ends_at = Some(now + self.duration);
        self.state.started_at = now;
        self.state.last_update = now;

        let opening = CrisisEvent::new(
            EventKind::System,
            self.scenario.inbrief.initial_situation.clone(),
            now,
        );
        log::info!(
            "Exercise started: scenario={} duration={}m",
            self.scenario.id,
            self.duration.num_minutes()
        );
        self.events.push(opening);
        Ok(())
    }

    pub fn end_exercise(&mut self) {
        if self.phase == ExercisePhase::Ended {
            return;
        }
        let now = self.clock.now();
        self.phase = ExercisePhase::Ended;
        self.events.push(CrisisEvent::new(
            EventKind::System,
            "The exercise has concluded.",
            now,
        ));
        log::info!("Exercise ended: scenario={}", self.scenario.id);
    }

    fn ensure_running(&self) -> Result<()> {
        match self.phase {
            ExercisePhase::Running => Ok(()),
            ExercisePhase::Setup => Err(ExerciseError::NotStarted),
            ExercisePhase::Ended => Err(ExerciseError::AlreadyEnded),
        }
    }

    // ===== decisions =====

    /// Submit a decision by its option text, with the follow-up answer when
    /// the option requires one. Returns every event the decision produced,
    /// in log order.
    pub async fn submit_decision(
        &mut self,
        option_text: &str,
        follow_up: Option<&str>,
    ) -> Result<Vec<CrisisEvent>> {
        self.ensure_running()?;

        let option = self
            .current_step()
            .and_then(|step| step.options.iter().find(|o| o.text == option_text))
            .or_else(|| self.scenario.find_option(option_text))
            .cloned()
            .ok_or_else(|| ExerciseError::UnknownOption(option_text.to_string()))?;

        if let Some(prompt) = &option.follow_up {
            prompt.validate(follow_up.unwrap_or(""))?;
        }

        let now = self.clock.now();
        let decision = CrisisEvent::new(EventKind::Decision, option.text.clone(), now);
        let mut produced = vec![decision.clone()];
        self.events.push(decision.clone());

        self.state.apply_action(&option.text, now);
        log::debug!(
            "Decision applied: {} trust={} media={} severity={}",
            option.text,
            self.state.public_trust,
            self.state.media_attention,
            self.state.severity
        );

        let generated = self
            .generator
            .generate_updates(
                Some(&decision),
                &self.state,
                &self.events,
                &self.scenario,
                false,
                &mut self.rng,
                now,
            )
            .await;
        for event in generated {
            produced.push(event.clone());
            self.events.push(event);
        }

        if let Some(event) = self.evaluate_journalist_trigger(false, now) {
            produced.push(event);
        }

        // A follow-up answer is an exchange with the step's stakeholders.
        if let (Some(text), Some(_)) = (follow_up, &option.follow_up) {
            self.stakeholders.record_interaction(
                EventKind::Stakeholder.default_sender(),
                Interaction::response(InteractionKind::Decision, text),
                self.state.severity,
                now,
            );
        }

        if let Some(next) = &option.next_step {
            self.current_step = next.clone();
        }

        Ok(produced)
    }

    // ===== time =====

    /// Advance the countdown, surface due timeline work, flush auto-dismissed
    /// messages. Call this on a cadence; it never blocks on generation.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.phase != ExercisePhase::Running {
            return outcome;
        }

        let now = self.clock.now();
        if let Some(ends_at) = self.ends_at {
            if now >= ends_at {
                self.end_exercise();
                outcome.ended = true;
                return outcome;
            }
        }

        let poll = self.timeline.poll(&self.state, &self.events, now);
        for beat in poll.due {
            outcome.events.push(self.surface_beat(beat, now));
        }
        for event in poll.generated {
            outcome.events.push(event.clone());
            self.events.push(event);
        }

        outcome.expired_messages = self.messages.flush_expired(now);
        for expired in &outcome.expired_messages {
            log::debug!("Message auto-dismissed: {} from {}", expired.id, expired.sender);
        }
        outcome
    }

    /// Skip `minutes` of simulated time: the timeline bursts, the journalist
    /// trigger is re-evaluated with the skip flag, and everything due inside
    /// the window lands at once.
    pub async fn skip_time(&mut self, minutes: i64) -> Result<Vec<CrisisEvent>> {
        self.ensure_running()?;
        let now = self.clock.now();

        let poll = self
            .timeline
            .skip_time(minutes, &self.state, &self.events, &mut self.rng, now)
            .await;

        let mut produced = Vec::new();
        for event in poll.generated {
            produced.push(event.clone());
            self.events.push(event);
        }
        for beat in poll.due {
            produced.push(self.surface_beat(beat, now + Duration::minutes(minutes)));
        }

        if let Some(event) = self.evaluate_journalist_trigger(true, now + Duration::minutes(minutes))
        {
            produced.push(event);
        }

        Ok(produced)
    }

    // ===== messages =====

    /// Respond to a visible message. Records the interaction against the
    /// sender and returns the stakeholder's acknowledgement.
    pub fn respond_to_message(&mut self, id: Uuid, response: &str) -> Result<String> {
        self.ensure_running()?;
        let message = self
            .messages
            .respond(id)
            .ok_or(ExerciseError::UnknownMessage(id))?;

        let now = self.clock.now();
        let kind = match message.channel {
            Channel::Call => InteractionKind::Call,
            _ => InteractionKind::Message,
        };
        self.stakeholders.record_interaction(
            &message.sender,
            Interaction::response(kind, response).with_message_id(id),
            self.state.severity,
            now,
        );

        Ok(self
            .stakeholders
            .acknowledgement(&message.sender, "Thank you for getting back to us."))
    }

    /// The trainee opened a reply editor; the message can no longer
    /// auto-dismiss.
    pub fn begin_reply(&mut self, id: Uuid) {
        self.messages.begin_reply(id);
    }

    /// Decline a visible message. The sender remembers.
    pub fn dismiss_message(&mut self, id: Uuid) -> Result<()> {
        self.ensure_running()?;
        let message = self
            .messages
            .dismiss(id)
            .ok_or(ExerciseError::UnknownMessage(id))?;

        let now = self.clock.now();
        let kind = match message.channel {
            Channel::Call => InteractionKind::Call,
            _ => InteractionKind::Message,
        };
        self.stakeholders.record_interaction(
            &message.sender,
            Interaction::declined(kind).with_message_id(id),
            self.state.severity,
            now,
        );
        Ok(())
    }

    // ===== internals =====

    /// Turn a due timeline beat into a log event, delivering a message when
    /// the beat demands a response.
    fn surface_beat(&mut self, beat: TimeBasedEvent, now: DateTime<Utc>) -> CrisisEvent {
        let mut event = CrisisEvent::new(beat.kind, beat.content.clone(), now);
        if let Some(severity) = beat.severity {
            event = event.with_severity(severity);
        }
        self.events.push(event.clone());

        if beat.requires_response {
            let mut message =
                StakeholderMessage::new(beat.kind.default_sender(), beat.content, now)
                    .with_urgency(Urgency::Urgent);
            if let Some(options) = beat.response_options {
                message = message.with_response_options(options);
            }
            self.messages.deliver(message, now);
        }
        event
    }

    /// When the policy fires, a journalist calls: one log event plus an
    /// urgent call message. The event content carries the journalist marker
    /// so the policy's cooldown keys off it.
    fn evaluate_journalist_trigger(
        &mut self,
        time_skipped: bool,
        now: DateTime<Utc>,
    ) -> Option<CrisisEvent> {
        if !escalation::should_trigger_journalist_call(
            &self.state,
            &self.events,
            time_skipped,
            &mut self.rng,
            now,
        ) {
            return None;
        }

        let content = format!(
            "A journalist from a national outlet is calling about the {} situation.",
            self.scenario.theme
        );
        let event = CrisisEvent::new(EventKind::Stakeholder, content.clone(), now)
            .with_severity(self.state.severity);
        self.events.push(event.clone());

        let message = StakeholderMessage::new("Journalist", content, now)
            .with_urgency(Urgency::Critical)
            .with_channel(Channel::Call)
            .with_response_options(vec![
                "Take the call".to_string(),
                "Decline and offer a written statement".to_string(),
            ]);
        self.messages.deliver(message, now);
        log::info!("Journalist call triggered (time_skipped={time_skipped})");
        Some(event)
    }
}
