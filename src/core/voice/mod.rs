//! Voice Call Module
//!
//! The journalist-call capability: start a conversational-agent session,
//! then exchange messages keyed by session id. Delivery is only ordered
//! within a session's request/response pairing.

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsCallProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::scenario::Scenario;
use crate::core::state::CrisisState;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unknown call session: {0}")]
    SessionNotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

pub type Result<T> = std::result::Result<T, VoiceError>;

// ============================================================================
// Call Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSettings {
    /// Voice stability (0.0 - 1.0)
    #[serde(default = "default_stability")]
    pub stability: f32,
    /// Similarity boost (0.0 - 1.0)
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,
}

fn default_stability() -> f32 {
    0.5
}
fn default_similarity_boost() -> f32 {
    0.75
}

impl Default for CallSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
        }
    }
}

/// Request to open a call with a conversational agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRequest {
    pub agent_id: String,
    pub opening_prompt: String,
    pub settings: CallSettings,
}

/// An open call session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    pub session_id: String,
    pub agent_name: String,
}

// ============================================================================
// Provider Trait
// ============================================================================

#[async_trait]
pub trait CallProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Open a call; returns the session handle.
    async fn start_call(&self, request: &CallRequest) -> Result<CallSession>;

    /// Send the trainee's line into an open call and get the agent's reply.
    async fn send_message(&self, session_id: &str, text: &str) -> Result<String>;
}

// ============================================================================
// Journalist Call Helper
// ============================================================================

/// Build the opening prompt for a journalist call from the live exercise
/// state, so the agent opens with questions proportionate to the pressure.
pub fn journalist_call_request(
    scenario: &Scenario,
    state: &CrisisState,
    agent_id: &str,
) -> CallRequest {
    let pressure = if state.public_trust < 50 {
        "Public trust is eroding; push hard on accountability."
    } else {
        "Coverage is still forming; probe for facts and a quotable line."
    };
    CallRequest {
        agent_id: agent_id.to_string(),
        opening_prompt: format!(
            "You are a journalist calling about: {}. Current situation: {}. {}",
            scenario.inbrief.title, scenario.inbrief.summary, pressure
        ),
        settings: CallSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scenario::catalog;
    use chrono::Utc;

    #[test]
    fn test_default_settings() {
        let settings = CallSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
    }

    #[test]
    fn test_journalist_prompt_reflects_trust() {
        let scenario = catalog::data_breach();
        let mut state = CrisisState::new(Utc::now());
        state.public_trust = 40;

        let request = journalist_call_request(&scenario, &state, "agent-1");
        assert!(request.opening_prompt.contains("accountability"));
        assert!(request.opening_prompt.contains(&scenario.inbrief.title));
    }
}
