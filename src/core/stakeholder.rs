//! Stakeholder Memory Store
//!
//! Per-stakeholder interaction history with keyword-derived sentiment, a
//! relationship status computed from the last three interactions, and
//! contact cooldowns. Entries are created lazily on first interaction and
//! live for the duration of the session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::state::Severity;

/// Words that read as constructive in a trainee's reply.
const POSITIVE_LEXICON: &[&str] = &["resolve", "improve", "address", "help", "support", "transparent"];
/// Words that read as evasive or combative.
const NEGATIVE_LEXICON: &[&str] = &["deny", "refuse", "ignore", "delay", "hide", "blame"];

/// Declining a stakeholder's contact freezes further contact for this long.
const DECLINE_COOLDOWN_MINUTES: i64 = 10;
/// Minimum re-contact interval when the last sentiment was negative.
const NEGATIVE_CONTACT_MINUTES: i64 = 3;
/// Minimum re-contact interval otherwise.
const DEFAULT_CONTACT_MINUTES: i64 = 5;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Hostile,
    Neutral,
    Supportive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Message,
    Call,
    Decision,
}

/// What happened in one exchange with a stakeholder.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub response: Option<String>,
    pub declined: bool,
    pub message_id: Option<Uuid>,
}

impl Interaction {
    pub fn response(kind: InteractionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            response: Some(text.into()),
            declined: false,
            message_id: None,
        }
    }

    pub fn declined(kind: InteractionKind) -> Self {
        Self {
            kind,
            response: None,
            declined: true,
            message_id: None,
        }
    }

    pub fn with_message_id(mut self, id: Uuid) -> Self {
        self.message_id = Some(id);
        self
    }
}

/// Append-only record of a past exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub message_id: Option<Uuid>,
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub kind: InteractionKind,
    pub sentiment: Sentiment,
}

/// Everything remembered about one stakeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderMemory {
    pub last_interaction: DateTime<Utc>,
    pub interaction_count: u32,
    pub cooldown_until: Option<DateTime<Utc>>,
    pub sentiment: Sentiment,
    pub relationship: Relationship,
    pub priority: Priority,
    pub history: Vec<InteractionRecord>,
}

impl StakeholderMemory {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_interaction: now,
            interaction_count: 0,
            cooldown_until: None,
            sentiment: Sentiment::Neutral,
            relationship: Relationship::Neutral,
            priority: Priority::Medium,
            history: Vec::new(),
        }
    }
}

// ============================================================================
// Sentiment & derivation rules
// ============================================================================

/// Keyword classification. Negative wins when both lexicons match; neither
/// matching reads as neutral.
pub fn classify_sentiment(response: &str) -> Sentiment {
    let lower = response.to_lowercase();
    if NEGATIVE_LEXICON.iter().any(|w| lower.contains(w)) {
        Sentiment::Negative
    } else if POSITIVE_LEXICON.iter().any(|w| lower.contains(w)) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Relationship from the sentiment of the last three interactions:
/// two-or-more positive reads supportive, else two-or-more negative reads
/// hostile, else neutral.
fn derive_relationship(history: &[InteractionRecord]) -> Relationship {
    let recent: Vec<Sentiment> = history.iter().rev().take(3).map(|r| r.sentiment).collect();
    let positives = recent.iter().filter(|s| **s == Sentiment::Positive).count();
    let negatives = recent.iter().filter(|s| **s == Sentiment::Negative).count();

    if positives >= 2 {
        Relationship::Supportive
    } else if negatives >= 2 {
        Relationship::Hostile
    } else {
        Relationship::Neutral
    }
}

fn derive_priority(severity: Severity, relationship: Relationship) -> Priority {
    if severity == Severity::High || relationship == Relationship::Hostile {
        Priority::High
    } else if relationship == Relationship::Supportive {
        Priority::Low
    } else {
        Priority::Medium
    }
}

// ============================================================================
// Store
// ============================================================================

/// Session-scoped store of stakeholder memories, keyed by stakeholder name.
#[derive(Debug, Default)]
pub struct StakeholderStore {
    memories: HashMap<String, StakeholderMemory>,
}

impl StakeholderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self, name: &str) -> Option<&StakeholderMemory> {
        self.memories.get(name)
    }

    /// Record one exchange with a stakeholder, creating the memory lazily.
    ///
    /// Declined contact marks the stakeholder hostile and engages a
    /// ten-minute cooldown. A textual response is sentiment-classified and
    /// appended; relationship and priority are re-derived afterwards.
    pub fn record_interaction(
        &mut self,
        name: &str,
        interaction: Interaction,
        severity: Severity,
        now: DateTime<Utc>,
    ) {
        let memory = self
            .memories
            .entry(name.to_string())
            .or_insert_with(|| StakeholderMemory::new(now));

        memory.interaction_count += 1;
        memory.last_interaction = now;

        if interaction.declined {
            memory.sentiment = Sentiment::Negative;
            memory.relationship = Relationship::Hostile;
            memory.cooldown_until = Some(now + Duration::minutes(DECLINE_COOLDOWN_MINUTES));
            memory.history.push(InteractionRecord {
                message_id: interaction.message_id,
                response: None,
                timestamp: now,
                kind: interaction.kind,
                sentiment: Sentiment::Negative,
            });
        } else if let Some(response) = interaction.response {
            let sentiment = classify_sentiment(&response);
            memory.sentiment = sentiment;
            memory.history.push(InteractionRecord {
                message_id: interaction.message_id,
                response: Some(response),
                timestamp: now,
                kind: interaction.kind,
                sentiment,
            });
            memory.relationship = derive_relationship(&memory.history);
        }

        memory.priority = derive_priority(severity, memory.relationship);
    }

    /// Whether this stakeholder may be contacted again right now.
    ///
    /// False inside a decline cooldown. Otherwise the elapsed time since the
    /// last interaction must exceed a sentiment-dependent minimum (three
    /// minutes after a negative exchange, five otherwise). A stakeholder we
    /// have never spoken to can always be contacted.
    pub fn should_contact(&self, name: &str, now: DateTime<Utc>) -> bool {
        let Some(memory) = self.memories.get(name) else {
            return true;
        };

        if let Some(until) = memory.cooldown_until {
            if now < until {
                return false;
            }
        }

        let minimum = if memory.sentiment == Sentiment::Negative {
            Duration::minutes(NEGATIVE_CONTACT_MINUTES)
        } else {
            Duration::minutes(DEFAULT_CONTACT_MINUTES)
        };

        now - memory.last_interaction > minimum
    }

    /// Canned relationship-flavored acknowledgement. A placeholder for
    /// richer generation, not language modeling.
    pub fn acknowledgement(&self, name: &str, default_text: &str) -> String {
        match self.memories.get(name).map(|m| m.relationship) {
            Some(Relationship::Hostile) => format!(
                "{default_text} Frankly, we expected a more thorough response given recent events."
            ),
            Some(Relationship::Supportive) => {
                format!("{default_text} We appreciate your continued openness with us.")
            }
            _ => default_text.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}
