//! OpenAI Provider Unit Tests
//!
//! HTTP-level tests against a mock server:
//! - Request formatting (auth header, system message placement)
//! - Response parsing (content, usage, finish reason)
//! - Error handling (rate limits, auth errors, malformed bodies)

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::providers::{OpenAIProvider, TextProvider};
use crate::core::llm::types::{ChatMessage, ChatRequest, LLMError};

fn provider(server: &MockServer) -> OpenAIProvider {
    OpenAIProvider::with_base_url(
        "sk-test".to_string(),
        "gpt-4o-mini".to_string(),
        server.uri(),
    )
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("What happened?")])
        .with_system("You are terse.")
        .with_temperature(0.2)
        .with_max_tokens(128)
}

fn success_body() -> serde_json::Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": "A breach occurred."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5}
    })
}

#[tokio::test]
async fn test_chat_parses_successful_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).chat(request()).await.unwrap();
    assert_eq!(response.content, "A breach occurred.");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens, 12);
    assert_eq!(usage.output_tokens, 5);
}

#[tokio::test]
async fn test_system_prompt_travels_as_first_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are terse."},
                {"role": "user", "content": "What happened?"}
            ],
            "temperature": 0.2,
            "max_tokens": 128
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server).chat(request()).await.unwrap();
}

#[tokio::test]
async fn test_rate_limit_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    match err {
        LLMError::ApiError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::ApiError { status: 401, .. }));
}

#[tokio::test]
async fn test_missing_content_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}
