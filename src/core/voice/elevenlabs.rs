//! ElevenLabs Conversational-Agent Provider

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::core::voice::{CallProvider, CallRequest, CallSession, Result, VoiceError};

const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

pub struct ElevenLabsCallProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsCallProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, ELEVENLABS_BASE_URL.to_string())
    }

    /// Point at a different host (also used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn check_status(response: &reqwest::Response) -> Result<()> {
        if response.status() == 429 {
            return Err(VoiceError::RateLimitExceeded);
        }
        if response.status() == 401 {
            return Err(VoiceError::ApiError("Invalid API key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CallProvider for ElevenLabsCallProvider {
    fn id(&self) -> &'static str {
        "elevenlabs"
    }

    async fn start_call(&self, request: &CallRequest) -> Result<CallSession> {
        let body = json!({
            "agent_id": request.agent_id,
            "conversation_config_override": {
                "agent": {
                    "first_message": request.opening_prompt,
                },
                "tts": {
                    "stability": request.settings.stability,
                    "similarity_boost": request.settings.similarity_boost,
                }
            }
        });

        let response = self
            .client
            .post(self.url("/v1/convai/conversations"))
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        Self::check_status(&response)?;
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::ApiError(format!(
                "ElevenLabs API error: {error_text}"
            )));
        }

        let data: serde_json::Value = response.json().await?;
        let session_id = data["conversation_id"]
            .as_str()
            .ok_or_else(|| VoiceError::InvalidResponse("Missing conversation_id".to_string()))?
            .to_string();
        let agent_name = data["agent_name"].as_str().unwrap_or("Journalist").to_string();

        Ok(CallSession {
            session_id,
            agent_name,
        })
    }

    async fn send_message(&self, session_id: &str, text: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url(&format!("/v1/convai/conversations/{session_id}/message")))
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&json!({ "text": text }))
            .send()
            .await?;

        Self::check_status(&response)?;
        if response.status() == 404 {
            return Err(VoiceError::SessionNotFound(session_id.to_string()));
        }
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::ApiError(format!(
                "ElevenLabs API error: {error_text}"
            )));
        }

        let data: serde_json::Value = response.json().await?;
        data["reply"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| VoiceError::InvalidResponse("Missing reply".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        let provider = ElevenLabsCallProvider::new("key".to_string());
        assert_eq!(provider.id(), "elevenlabs");
    }

    #[test]
    fn test_url_building() {
        let provider =
            ElevenLabsCallProvider::with_base_url("key".to_string(), "http://host:9000/".to_string());
        assert_eq!(
            provider.url("/v1/convai/conversations"),
            "http://host:9000/v1/convai/conversations"
        );
    }
}
