//! Escalation / Trigger Policy
//!
//! Pure decision functions: whether a journalist call should interrupt the
//! trainee, and whether the narrative should escalate.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::core::events::{CrisisEvent, EventKind};
use crate::core::state::{CrisisState, Severity};

/// Substring (lowercased) identifying journalist contact in event content.
pub const JOURNALIST_MARKER: &str = "journalist";

/// Minimum quiet period between journalist calls.
pub const JOURNALIST_COOLDOWN_SECS: i64 = 300;

/// Media-attention level beyond which journalists start calling on their own.
const MEDIA_ATTENTION_TRIGGER: i32 = 70;

/// Chance gate for a journalist call after a time skip.
const TIME_SKIP_DRAW_THRESHOLD: f64 = 0.7;

/// Most recent journalist contact: a stakeholder event whose content
/// mentions a journalist. `None` means no contact yet, which never blocks a
/// trigger.
pub fn last_journalist_contact(events: &[CrisisEvent]) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|e| {
            e.kind == EventKind::Stakeholder && e.content.to_lowercase().contains(JOURNALIST_MARKER)
        })
        .map(|e| e.timestamp)
        .max()
}

/// Whether a journalist call should fire now.
///
/// True when the cooldown since the last journalist contact has elapsed and
/// any of: some past event reached high severity, media attention is above
/// the trigger level, or a time skip passed the random draw.
pub fn should_trigger_journalist_call<R: Rng>(
    state: &CrisisState,
    events: &[CrisisEvent],
    time_skipped: bool,
    rng: &mut R,
    now: DateTime<Utc>,
) -> bool {
    let cooldown_elapsed = match last_journalist_contact(events) {
        Some(last) => now - last > Duration::seconds(JOURNALIST_COOLDOWN_SECS),
        None => true,
    };
    if !cooldown_elapsed {
        return false;
    }

    let has_high_severity_event = events.iter().any(|e| e.severity == Some(Severity::High));
    if has_high_severity_event {
        return true;
    }

    if state.media_attention > MEDIA_ATTENTION_TRIGGER {
        return true;
    }

    time_skipped && rng.gen::<f64>() > TIME_SKIP_DRAW_THRESHOLD
}

/// Whether an incoming development escalates the narrative. Reduces to the
/// current severity being high; the recent-events input the original design
/// consulted was always empty, so it carries no signal.
pub fn should_escalate(state: &CrisisState) -> bool {
    state.severity == Severity::High
}
