//! Text-Generation Provider Implementations
//!
//! Concrete implementations of the `TextProvider` trait. Adding a provider
//! means implementing the trait and wiring it into the narrative backend.

mod openai;

pub use openai::OpenAIProvider;

use crate::core::llm::types::{ChatRequest, ChatResponse, Result};
use async_trait::async_trait;

/// A chat-completion-style text generation capability.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Stable provider identifier, e.g. "openai".
    fn id(&self) -> &str;

    /// Model this provider is configured for.
    fn model(&self) -> &str;

    /// Cheap liveness/config check; never performs generation.
    async fn health_check(&self) -> bool;

    /// Perform one chat completion.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
