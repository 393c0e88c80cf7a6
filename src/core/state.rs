//! Crisis State Tracker
//!
//! Tracks the global numeric state of a running exercise: public trust,
//! media attention, and internal morale, each clamped to [0, 100], plus a
//! severity classification derived from trust and media attention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Severity
// ============================================================================

/// Three-level classification of how dangerous the situation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Action impact table
// ============================================================================

/// Per-action deltas applied to (trust, media, morale).
#[derive(Clone, Copy, Debug)]
pub struct ActionImpact {
    pub action: &'static str,
    pub trust: i32,
    pub media: i32,
    pub morale: i32,
}

/// Canonical impact table. Unknown action ids apply zero deltas.
pub const ACTION_IMPACTS: &[ActionImpact] = &[
    ActionImpact {
        action: "Monitor the situation",
        trust: -2,
        media: 5,
        morale: 0,
    },
    ActionImpact {
        action: "Issue a public statement",
        trust: 10,
        media: -5,
        morale: 0,
    },
    ActionImpact {
        action: "Hold a press conference",
        trust: 8,
        media: -8,
        morale: 3,
    },
    ActionImpact {
        action: "Brief internal teams",
        trust: 0,
        media: 0,
        morale: 10,
    },
    ActionImpact {
        action: "Engage legal counsel",
        trust: -3,
        media: 3,
        morale: -2,
    },
    ActionImpact {
        action: "Activate the crisis response team",
        trust: 5,
        media: 2,
        morale: 5,
    },
];

fn find_impact(action: &str) -> Option<&'static ActionImpact> {
    ACTION_IMPACTS.iter().find(|i| i.action == action)
}

// ============================================================================
// Crisis State
// ============================================================================

/// Numeric state of a running exercise. Owned by the session context and
/// mutated in place; callers that need to read across an await point must
/// take a [`CrisisState::snapshot`] rather than hold a live reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisState {
    /// Public trust in the organisation, [0, 100].
    pub public_trust: i32,
    /// Media attention on the crisis, [0, 100].
    pub media_attention: i32,
    /// Internal team morale, [0, 100].
    pub internal_morale: i32,
    /// Derived from trust and media attention; never set directly.
    pub severity: Severity,
    /// When the exercise session started.
    pub started_at: DateTime<Utc>,
    /// Last time any counter changed.
    pub last_update: DateTime<Utc>,
    /// Action ids already taken this session.
    pub used_actions: BTreeSet<String>,
}

impl CrisisState {
    /// Fresh state for a new session: full trust and morale, no attention.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            public_trust: 100,
            media_attention: 0,
            internal_morale: 100,
            severity: Severity::Low,
            started_at: now,
            last_update: now,
            used_actions: BTreeSet::new(),
        }
    }

    /// Severity is a pure function of trust and media attention.
    pub fn derive_severity(trust: i32, media: i32) -> Severity {
        if trust < 30 || media > 80 {
            Severity::High
        } else if trust < 60 || media > 50 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Apply an action's impact: add the per-action deltas, clamp every
    /// counter to [0, 100], mark the action used, recompute severity.
    /// Unknown action ids are accepted and apply zero deltas.
    pub fn apply_action(&mut self, action_id: &str, now: DateTime<Utc>) {
        if let Some(impact) = find_impact(action_id) {
            self.public_trust = (self.public_trust + impact.trust).clamp(0, 100);
            self.media_attention = (self.media_attention + impact.media).clamp(0, 100);
            self.internal_morale = (self.internal_morale + impact.morale).clamp(0, 100);
        }

        self.used_actions.insert(action_id.to_string());
        self.severity = Self::derive_severity(self.public_trust, self.media_attention);
        self.last_update = now;
    }

    /// Owned copy for use across suspension points.
    pub fn snapshot(&self) -> CrisisState {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CrisisState {
        CrisisState::new(Utc::now())
    }

    #[test]
    fn test_default_state_is_calm() {
        let s = state();
        assert_eq!(s.public_trust, 100);
        assert_eq!(s.media_attention, 0);
        assert_eq!(s.internal_morale, 100);
        assert_eq!(s.severity, Severity::Low);
    }

    #[test]
    fn test_severity_thresholds() {
        // trust<30 rule fires regardless of morale
        assert_eq!(CrisisState::derive_severity(25, 10), Severity::High);
        assert_eq!(CrisisState::derive_severity(90, 85), Severity::High);
        assert_eq!(CrisisState::derive_severity(50, 10), Severity::Medium);
        assert_eq!(CrisisState::derive_severity(90, 60), Severity::Medium);
        assert_eq!(CrisisState::derive_severity(90, 10), Severity::Low);
    }

    #[test]
    fn test_public_statement_clamps_at_bounds() {
        let mut s = state();
        s.apply_action("Issue a public statement", Utc::now());
        assert_eq!(s.public_trust, 100); // 100 + 10, clamped
        assert_eq!(s.media_attention, 0); // 0 - 5, clamped
        assert_eq!(s.severity, Severity::Low);
    }

    #[test]
    fn test_monitoring_erodes_trust() {
        let mut s = state();
        s.apply_action("Monitor the situation", Utc::now());
        assert_eq!(s.public_trust, 98);
        assert_eq!(s.media_attention, 5);
        assert!(s.used_actions.contains("Monitor the situation"));
    }

    #[test]
    fn test_unknown_action_is_a_noop_delta() {
        let mut s = state();
        s.apply_action("Do a backflip", Utc::now());
        assert_eq!(s.public_trust, 100);
        assert_eq!(s.media_attention, 0);
        assert_eq!(s.internal_morale, 100);
        // Still marked used
        assert!(s.used_actions.contains("Do a backflip"));
    }

    #[test]
    fn test_repeated_monitoring_drives_severity_up() {
        let mut s = state();
        for _ in 0..20 {
            s.apply_action("Monitor the situation", Utc::now());
        }
        // trust 100 - 40 = 60, media 0 + 100 clamped to 100
        assert_eq!(s.media_attention, 100);
        assert_eq!(s.severity, Severity::High);
    }
}
