//! Scenario Definitions
//!
//! Static configuration consumed by the exercise orchestrator: an inbrief,
//! a step graph of decision options, and optional required follow-up
//! prompts with `length:<max>` validation hints.

pub mod catalog;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Validation
// ============================================================================

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A response is required")]
    Empty,

    #[error("Response exceeds {max} characters")]
    TooLong { max: usize },
}

/// Parse a validation hint of the form `length:<max>`. Unknown hints are
/// ignored (no constraint).
pub fn parse_length_hint(hint: &str) -> Option<usize> {
    hint.strip_prefix("length:")?.trim().parse().ok()
}

// ============================================================================
// Types
// ============================================================================

/// Impact weight of a decision option, as authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// A required free-text clarification attached to a decision option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUp {
    pub prompt: String,
    /// Validation hint, e.g. "length:300".
    pub validation: Option<String>,
}

impl FollowUp {
    /// Check a trainee's follow-up text against this prompt's constraints.
    pub fn validate(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if let Some(max) = self.validation.as_deref().and_then(parse_length_hint) {
            if text.chars().count() > max {
                return Err(ValidationError::TooLong { max });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOption {
    pub text: String,
    pub impact: ImpactLevel,
    /// Step to advance to once this option is taken.
    pub next_step: Option<String>,
    pub consequence: String,
    pub follow_up: Option<FollowUp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub id: String,
    pub description: String,
    pub options: Vec<DecisionOption>,
    pub time_limit_secs: Option<u32>,
}

/// Pre-exercise briefing shown to the trainee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inbrief {
    pub title: String,
    pub summary: String,
    pub objectives: Vec<String>,
    pub stakeholders: Vec<String>,
    pub resources: Vec<String>,
    pub initial_situation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub category: String,
    /// Theme used for generated news headlines.
    pub theme: String,
    pub inbrief: Inbrief,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn step(&self, id: &str) -> Option<&ScenarioStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn first_step(&self) -> Option<&ScenarioStep> {
        self.steps.first()
    }

    /// Find an option by its text anywhere in the step graph.
    pub fn find_option(&self, text: &str) -> Option<&DecisionOption> {
        self.steps
            .iter()
            .flat_map(|s| s.options.iter())
            .find(|o| o.text == text)
    }
}
