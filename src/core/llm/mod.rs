//! Text Generation Module
//!
//! Chat-completion glue for the narrative engine: shared request/response
//! types, the `TextProvider` trait with its OpenAI-compatible
//! implementation, and the `NarrativeBackend` abstraction the event
//! generator consumes.

pub mod narrative;
pub mod providers;
pub mod types;

pub use narrative::{
    CannedNarrativeBackend, DecisionAnalysis, DecisionAnalysisRequest, LlmNarrativeBackend,
    NarrativeBackend, NewsArticleRequest, StakeholderReaction, StakeholderUpdateRequest, Tone,
};
pub use providers::{OpenAIProvider, TextProvider};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, LLMError, MessageRole, Result, TokenUsage,
};
