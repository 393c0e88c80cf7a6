//! Event and Message Types
//!
//! The narrative surface of an exercise: timeline entries (`CrisisEvent`),
//! stakeholder communications (`StakeholderMessage`), and the scheduling
//! unit consumed by the timeline (`TimeBasedEvent`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::state::Severity;

// ============================================================================
// Crisis Events
// ============================================================================

/// Kind of a timeline event. Consumers match exhaustively; there is no
/// fallback/default case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Stakeholder,
    Media,
    Internal,
    Government,
    Competitor,
    Event,
    Decision,
    Consequence,
    System,
    TimeUpdate,
    Escalation,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Stakeholder => "stakeholder",
            EventKind::Media => "media",
            EventKind::Internal => "internal",
            EventKind::Government => "government",
            EventKind::Competitor => "competitor",
            EventKind::Event => "event",
            EventKind::Decision => "decision",
            EventKind::Consequence => "consequence",
            EventKind::System => "system",
            EventKind::TimeUpdate => "time_update",
            EventKind::Escalation => "escalation",
        }
    }

    /// Display name used when an event of this kind needs a message sender.
    pub fn default_sender(&self) -> &'static str {
        match self {
            EventKind::Stakeholder => "Key Stakeholder",
            EventKind::Media => "Press Desk",
            EventKind::Internal => "Operations Team",
            EventKind::Government => "Government Liaison",
            EventKind::Competitor => "Market Intelligence",
            _ => "System",
        }
    }
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Resolved,
    Escalated,
}

/// One entry in the session's append-only event log. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Threads a decision to its consequence.
    pub parent_event_id: Option<Uuid>,
    pub status: EventStatus,
    pub severity: Option<Severity>,
}

impl CrisisEvent {
    pub fn new(kind: EventKind, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: content.into(),
            timestamp,
            parent_event_id: None,
            status: EventStatus::Active,
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_parent(mut self, parent: Uuid) -> Self {
        self.parent_event_id = Some(parent);
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// Stakeholder Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
    Critical,
}

/// Channel a stakeholder message arrives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Text,
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
    Responded,
    Dismissed,
}

/// A communication from a stakeholder awaiting the trainee's attention.
/// Lives in the visible message set until responded, dismissed, or
/// auto-dismissed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderMessage {
    pub id: Uuid,
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub urgency: Urgency,
    pub response_deadline: Option<DateTime<Utc>>,
    pub channel: Channel,
    pub status: MessageStatus,
    pub response_options: Option<Vec<String>>,
    /// When the message is silently removed if left untouched. Cleared once
    /// the trainee starts a reply.
    pub dismiss_at: Option<DateTime<Utc>>,
}

impl StakeholderMessage {
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            content: content.into(),
            timestamp,
            urgency: Urgency::Normal,
            response_deadline: None,
            channel: Channel::Email,
            status: MessageStatus::Unread,
            response_options: None,
            dismiss_at: None,
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_response_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.response_deadline = Some(deadline);
        self
    }

    pub fn with_response_options(mut self, options: Vec<String>) -> Self {
        self.response_options = Some(options);
        self
    }
}

// ============================================================================
// Time-Based Events
// ============================================================================

/// Scheduling unit held by the timeline: a narrative beat that surfaces once
/// its trigger offset (from session start) has elapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBasedEvent {
    /// Offset from session start at which this event becomes due.
    #[serde(with = "duration_secs")]
    pub trigger_offset: Duration,
    pub kind: EventKind,
    pub content: String,
    pub severity: Option<Severity>,
    pub requires_response: bool,
    pub response_options: Option<Vec<String>>,
}

impl TimeBasedEvent {
    pub fn new(trigger_offset: Duration, kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            trigger_offset,
            kind,
            content: content.into(),
            severity: None,
            requires_response: false,
            response_options: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn requiring_response(mut self, options: Option<Vec<String>>) -> Self {
        self.requires_response = true;
        self.response_options = options;
        self
    }
}

/// chrono::Duration has no serde support; store whole seconds.
mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::seconds(i64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder_chain() {
        let now = Utc::now();
        let parent = Uuid::new_v4();
        let event = CrisisEvent::new(EventKind::Consequence, "Fallout", now)
            .with_severity(Severity::High)
            .with_parent(parent)
            .with_status(EventStatus::Escalated);

        assert_eq!(event.kind, EventKind::Consequence);
        assert_eq!(event.severity, Some(Severity::High));
        assert_eq!(event.parent_event_id, Some(parent));
        assert_eq!(event.status, EventStatus::Escalated);
    }

    #[test]
    fn test_event_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::TimeUpdate).unwrap();
        assert_eq!(json, "\"time_update\"");
        assert_eq!(EventKind::TimeUpdate.as_str(), "time_update");
    }

    #[test]
    fn test_time_based_event_roundtrip() {
        let event = TimeBasedEvent::new(Duration::minutes(2), EventKind::Media, "Breaking news")
            .with_severity(Severity::Medium)
            .requiring_response(Some(vec!["Acknowledge".to_string()]));

        let json = serde_json::to_string(&event).unwrap();
        let back: TimeBasedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trigger_offset, Duration::minutes(2));
        assert!(back.requires_response);
        assert_eq!(back.response_options.unwrap().len(), 1);
    }

    #[test]
    fn test_message_starts_unread() {
        let msg = StakeholderMessage::new("Operations Team", "We need guidance", Utc::now());
        assert_eq!(msg.status, MessageStatus::Unread);
        assert_eq!(msg.urgency, Urgency::Normal);
        assert!(msg.dismiss_at.is_none());
    }
}
