//! Timeline Scheduler
//!
//! Owns the scripted narrative beats and the cadence of spontaneous
//! generation. `poll` surfaces whatever is due and, at most once a minute,
//! spawns a background generation batch whose results merge into a later
//! poll — the caller never blocks on the backend. `skip_time` compresses a
//! window of simulated minutes into an immediate burst.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::core::events::{CrisisEvent, EventKind, TimeBasedEvent};
use crate::core::generator::EventGenerator;
use crate::core::scenario::Scenario;
use crate::core::state::{CrisisState, Severity};

/// Minimum spacing between background generation batches.
const GENERATION_INTERVAL_SECS: i64 = 60;

/// Result of a scheduler poll: scripted beats that came due, plus any
/// background-generated events that finished since the last poll.
#[derive(Debug, Default)]
pub struct TimelinePoll {
    pub due: Vec<TimeBasedEvent>,
    pub generated: Vec<CrisisEvent>,
}

impl TimelinePoll {
    pub fn is_empty(&self) -> bool {
        self.due.is_empty() && self.generated.is_empty()
    }
}

pub struct TimelineScheduler {
    start: DateTime<Utc>,
    scheduled: Vec<TimeBasedEvent>,
    last_generation: DateTime<Utc>,
    generator: Arc<EventGenerator>,
    scenario: Arc<Scenario>,
    tx: mpsc::UnboundedSender<Vec<CrisisEvent>>,
    rx: mpsc::UnboundedReceiver<Vec<CrisisEvent>>,
}

impl TimelineScheduler {
    pub fn new(
        start: DateTime<Utc>,
        generator: Arc<EventGenerator>,
        scenario: Arc<Scenario>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut scheduler = Self {
            start,
            scheduled: Vec::new(),
            last_generation: start,
            generator,
            scenario,
            tx,
            rx,
        };
        for beat in seeded_beats() {
            scheduler.add_event(beat);
        }
        scheduler
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Insert keeping the list sorted by trigger offset.
    pub fn add_event(&mut self, event: TimeBasedEvent) {
        let pos = self
            .scheduled
            .partition_point(|e| e.trigger_offset <= event.trigger_offset);
        self.scheduled.insert(pos, event);
    }

    pub fn pending(&self) -> &[TimeBasedEvent] {
        &self.scheduled
    }

    /// Surface everything due at `now`, merge finished background batches,
    /// and kick off a new background batch if the interval has elapsed.
    pub fn poll(
        &mut self,
        state: &CrisisState,
        past_events: &[CrisisEvent],
        now: DateTime<Utc>,
    ) -> TimelinePoll {
        let mut result = TimelinePoll {
            due: self.take_due(now),
            generated: self.drain_background(),
        };
        result.generated.sort_by_key(|e| e.timestamp);

        if now - self.last_generation > Duration::seconds(GENERATION_INTERVAL_SECS) {
            self.last_generation = now;
            self.spawn_generation(state.snapshot(), past_events.to_vec(), now);
        }

        result
    }

    /// Advance the narrative by `minutes` at once: a burst of 2-4 generation
    /// batches scattered across the skipped window, a System notice at the
    /// moment the skip was requested, and every scripted beat that falls due
    /// by the end of the window.
    pub async fn skip_time<R: Rng + Send>(
        &mut self,
        minutes: i64,
        state: &CrisisState,
        past_events: &[CrisisEvent],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> TimelinePoll {
        let window_secs = minutes * 60;
        let batches = rng.gen_range(2..=4usize);
        let mut offsets: Vec<i64> = (0..batches)
            .map(|_| rng.gen_range(0..window_secs.max(1)))
            .collect();
        offsets.sort_unstable();

        let mut generated = vec![CrisisEvent::new(
            EventKind::System,
            format!("Time advanced by {minutes} minutes. The situation has developed."),
            now,
        )];

        for offset in offsets {
            let at = now + Duration::seconds(offset);
            let batch = self
                .generator
                .generate_updates(None, state, past_events, &self.scenario, true, rng, at)
                .await;
            generated.extend(batch);
        }

        generated.extend(self.drain_background());
        generated.sort_by_key(|e| e.timestamp);

        let end = now + Duration::minutes(minutes);
        self.last_generation = end;

        TimelinePoll {
            due: self.take_due(end),
            generated,
        }
    }

    fn take_due(&mut self, now: DateTime<Utc>) -> Vec<TimeBasedEvent> {
        let elapsed = now - self.start;
        let split = self
            .scheduled
            .partition_point(|e| e.trigger_offset <= elapsed);
        self.scheduled.drain(..split).collect()
    }

    fn drain_background(&mut self) -> Vec<CrisisEvent> {
        let mut merged = Vec::new();
        while let Ok(batch) = self.rx.try_recv() {
            merged.extend(batch);
        }
        merged
    }

    fn spawn_generation(
        &self,
        state: CrisisState,
        past_events: Vec<CrisisEvent>,
        now: DateTime<Utc>,
    ) {
        let tx = self.tx.clone();
        let generator = self.generator.clone();
        let scenario = self.scenario.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let batch = generator
                .generate_updates(None, &state, &past_events, &scenario, false, &mut rng, now)
                .await;
            // Receiver may be gone if the session ended; nothing to do then.
            let _ = tx.send(batch);
        });
    }
}

/// Scripted beats every session opens with.
fn seeded_beats() -> Vec<TimeBasedEvent> {
    vec![
        TimeBasedEvent::new(
            Duration::minutes(2),
            EventKind::Media,
            "Local outlets have picked up the story and are seeking comment.",
        )
        .with_severity(Severity::Medium),
        TimeBasedEvent::new(
            Duration::minutes(5),
            EventKind::Stakeholder,
            "A key partner is asking for a direct update on the response.",
        )
        .requiring_response(Some(vec![
            "Provide a full update".to_string(),
            "Share a brief holding line".to_string(),
        ])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::narrative::CannedNarrativeBackend;
    use crate::core::scenario::catalog;

    fn scheduler(start: DateTime<Utc>) -> TimelineScheduler {
        let generator = Arc::new(EventGenerator::new(Arc::new(CannedNarrativeBackend)));
        TimelineScheduler::new(start, generator, Arc::new(catalog::data_breach()))
    }

    #[tokio::test]
    async fn test_seeded_beats_surface_in_order() {
        let start = Utc::now();
        let mut timeline = scheduler(start);
        let state = CrisisState::new(start);

        let poll = timeline.poll(&state, &[], start + Duration::minutes(1));
        assert!(poll.due.is_empty());

        let poll = timeline.poll(&state, &[], start + Duration::minutes(2));
        assert_eq!(poll.due.len(), 1);
        assert_eq!(poll.due[0].kind, EventKind::Media);

        let poll = timeline.poll(&state, &[], start + Duration::minutes(6));
        assert_eq!(poll.due.len(), 1);
        assert!(poll.due[0].requires_response);
    }

    #[tokio::test]
    async fn test_add_event_keeps_order() {
        let start = Utc::now();
        let mut timeline = scheduler(start);
        timeline.add_event(TimeBasedEvent::new(
            Duration::minutes(3),
            EventKind::Internal,
            "Ops requests a check-in.",
        ));

        let offsets: Vec<i64> = timeline
            .pending()
            .iter()
            .map(|e| e.trigger_offset.num_minutes())
            .collect();
        assert_eq!(offsets, vec![2, 3, 5]);
    }

    #[tokio::test]
    async fn test_skip_time_bursts_and_flushes_due_beats() {
        let start = Utc::now();
        let mut timeline = scheduler(start);
        let state = CrisisState::new(start);
        let mut rng = StdRng::seed_from_u64(42);

        let poll = timeline.skip_time(30, &state, &[], &mut rng, start).await;

        // System notice plus 2-4 batches of 3 (severity low, canned).
        assert!(poll.generated.len() >= 7, "got {}", poll.generated.len());
        assert!(poll.generated[0]
            .content
            .contains("Time advanced by 30 minutes"));
        // Both seeded beats fall inside a 30-minute window.
        assert_eq!(poll.due.len(), 2);
        // Merged batch is timestamp-ordered.
        for pair in poll.generated.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_background_batch_merges_on_later_poll() {
        let start = Utc::now();
        let mut timeline = scheduler(start);
        let state = CrisisState::new(start);

        // First poll past the interval spawns a background batch.
        let first = timeline.poll(&state, &[], start + Duration::seconds(61));
        assert!(first.generated.is_empty());

        // Give the spawned task a moment, then drain.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let second = timeline.poll(&state, &[], start + Duration::seconds(62));
        // Ordinary batches carry at most one event.
        assert!(second.generated.len() <= 1);
    }
}
