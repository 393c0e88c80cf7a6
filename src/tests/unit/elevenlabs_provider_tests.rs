//! ElevenLabs Provider Unit Tests
//!
//! HTTP-level tests against a mock server:
//! - Call session creation and response parsing
//! - Message exchange within a session
//! - Error handling (rate limits, auth, unknown sessions)

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::voice::{
    CallProvider, CallRequest, CallSettings, ElevenLabsCallProvider, VoiceError,
};

fn provider(server: &MockServer) -> ElevenLabsCallProvider {
    ElevenLabsCallProvider::with_base_url("xi-test".to_string(), server.uri())
}

fn call_request() -> CallRequest {
    CallRequest {
        agent_id: "agent-7".to_string(),
        opening_prompt: "You are a journalist calling about the breach.".to_string(),
        settings: CallSettings::default(),
    }
}

#[tokio::test]
async fn test_start_call_parses_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations"))
        .and(header("xi-api-key", "xi-test"))
        .and(body_partial_json(json!({"agent_id": "agent-7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversation_id": "conv-123",
            "agent_name": "Dana Cole"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = provider(&server).start_call(&call_request()).await.unwrap();
    assert_eq!(session.session_id, "conv-123");
    assert_eq!(session.agent_name, "Dana Cole");
}

#[tokio::test]
async fn test_start_call_defaults_agent_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"conversation_id": "conv-9"})),
        )
        .mount(&server)
        .await;

    let session = provider(&server).start_call(&call_request()).await.unwrap();
    assert_eq!(session.agent_name, "Journalist");
}

#[tokio::test]
async fn test_send_message_returns_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations/conv-123/message"))
        .and(body_partial_json(json!({"text": "No comment yet."})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"reply": "Readers will draw their own conclusions."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider(&server)
        .send_message("conv-123", "No comment yet.")
        .await
        .unwrap();
    assert_eq!(reply, "Readers will draw their own conclusions.");
}

#[tokio::test]
async fn test_rate_limit_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server).start_call(&call_request()).await.unwrap_err();
    assert!(matches!(err, VoiceError::RateLimitExceeded));
}

#[tokio::test]
async fn test_invalid_key_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider(&server).start_call(&call_request()).await.unwrap_err();
    assert!(matches!(err, VoiceError::ApiError(_)));
}

#[tokio::test]
async fn test_unknown_session_is_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/convai/conversations/nope/message"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider(&server).send_message("nope", "hello").await.unwrap_err();
    assert!(matches!(err, VoiceError::SessionNotFound(_)));
}
