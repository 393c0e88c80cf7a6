//! Narrative Backend
//!
//! The opaque text-generation capability the event generator calls into:
//! news articles, stakeholder updates, and decision analysis. Backed either
//! by a `TextProvider` (live generation) or by canned templates. Generation
//! failures are the caller's problem to recover from — helpers here only
//! report them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::llm::providers::TextProvider;
use crate::core::llm::types::{ChatMessage, ChatRequest, Result};
use crate::core::stakeholder::Sentiment;
use crate::core::state::Severity;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Editorial tone requested for a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Critical,
    Neutral,
}

#[derive(Debug, Clone)]
pub struct NewsArticleRequest {
    pub headline: String,
    /// Contents of the most recent events, newest first.
    pub context: Vec<String>,
    pub tone: Tone,
}

#[derive(Debug, Clone)]
pub struct StakeholderUpdateRequest {
    pub severity: Severity,
    pub recent: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DecisionAnalysisRequest {
    pub decision: String,
    pub past_decisions: Vec<String>,
    pub severity: Severity,
    pub stakeholder_mood: Sentiment,
}

/// One stakeholder's reaction inside a decision analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeholderReaction {
    pub stakeholder: String,
    pub reaction: String,
}

/// Structured result of analyzing a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    pub narrative: String,
    pub reactions: Vec<StakeholderReaction>,
}

impl DecisionAnalysis {
    /// Generic continuation used whenever analysis is unavailable.
    pub fn fallback() -> Self {
        Self {
            narrative: "Your decision has been acknowledged. Teams are assessing the \
                        impact and will report back shortly."
                .to_string(),
            reactions: Vec::new(),
        }
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Write a short news article under the given headline.
    async fn news_article(&self, request: &NewsArticleRequest) -> Result<String>;

    /// Write a brief update from some stakeholder's perspective.
    async fn stakeholder_update(&self, request: &StakeholderUpdateRequest) -> Result<String>;

    /// Analyze a trainee decision into a narrative plus stakeholder reactions.
    async fn analyze_decision(&self, request: &DecisionAnalysisRequest) -> Result<DecisionAnalysis>;
}

// ============================================================================
// LLM-Backed Implementation
// ============================================================================

pub struct LlmNarrativeBackend {
    provider: Arc<dyn TextProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmNarrativeBackend {
    pub fn new(provider: Arc<dyn TextProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    async fn complete(&self, system: &str, user: String) -> Result<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(user)])
            .with_system(system)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        let response = self.provider.chat(request).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl NarrativeBackend for LlmNarrativeBackend {
    async fn news_article(&self, request: &NewsArticleRequest) -> Result<String> {
        let tone = match request.tone {
            Tone::Critical => "critical and probing",
            Tone::Neutral => "neutral and factual",
        };
        let user = format!(
            "Headline: {}\nRecent developments:\n{}\n\nWrite a two-paragraph news article \
             with a {} tone. No preamble.",
            request.headline,
            bullet_list(&request.context),
            tone,
        );
        self.complete(
            "You are a wire-service journalist covering a corporate crisis.",
            user,
        )
        .await
    }

    async fn stakeholder_update(&self, request: &StakeholderUpdateRequest) -> Result<String> {
        let user = format!(
            "Crisis severity: {}\nRecent developments:\n{}\n\nWrite one short update \
             (2-3 sentences) from a stakeholder's perspective. No preamble.",
            request.severity,
            bullet_list(&request.recent),
        );
        self.complete(
            "You voice stakeholders inside a crisis-management training exercise.",
            user,
        )
        .await
    }

    async fn analyze_decision(&self, request: &DecisionAnalysisRequest) -> Result<DecisionAnalysis> {
        let mood = match request.stakeholder_mood {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
        };
        let user = format!(
            "Decision just taken: {}\nPrior decisions:\n{}\nCrisis severity: {}\n\
             Stakeholder mood: {}\n\nFirst write one paragraph describing the immediate \
             consequences. Then list up to three stakeholder reactions, one per line, \
             each formatted as \"- Name: reaction\".",
            request.decision,
            bullet_list(&request.past_decisions),
            request.severity,
            mood,
        );
        let text = self
            .complete(
                "You are the scenario director of a crisis-management training exercise.",
                user,
            )
            .await?;
        Ok(parse_decision_analysis(&text))
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".to_string();
    }
    items
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Loose-Format Parsing
// ============================================================================

/// Parse the loose section-delimited analysis format: a leading paragraph,
/// then dash-prefixed reaction lines. Tolerates missing sections by
/// substituting defaults; never fails.
pub fn parse_decision_analysis(text: &str) -> DecisionAnalysis {
    let mut narrative_lines: Vec<&str> = Vec::new();
    let mut reactions: Vec<StakeholderReaction> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("-")) {
            let rest = rest.trim();
            if rest.is_empty() {
                continue;
            }
            let (stakeholder, reaction) = match rest.split_once(':') {
                Some((name, body)) if !name.trim().is_empty() => {
                    (name.trim().to_string(), body.trim().to_string())
                }
                _ => ("Stakeholder".to_string(), rest.to_string()),
            };
            reactions.push(StakeholderReaction {
                stakeholder,
                reaction,
            });
        } else if !trimmed.is_empty() && reactions.is_empty() {
            narrative_lines.push(trimmed);
        }
    }

    let narrative = narrative_lines.join(" ");
    if narrative.is_empty() {
        let mut fallback = DecisionAnalysis::fallback();
        fallback.reactions = reactions;
        fallback
    } else {
        DecisionAnalysis {
            narrative,
            reactions,
        }
    }
}

// ============================================================================
// Canned Implementation
// ============================================================================

/// Template-driven backend for offline runs and tests. Output varies only
/// by request shape, never by randomness.
#[derive(Debug, Default)]
pub struct CannedNarrativeBackend;

#[async_trait]
impl NarrativeBackend for CannedNarrativeBackend {
    async fn news_article(&self, request: &NewsArticleRequest) -> Result<String> {
        let slant = match request.tone {
            Tone::Critical => "Observers question whether leadership has grasped the scale \
                               of the problem.",
            Tone::Neutral => "The organisation says it is assessing the situation.",
        };
        Ok(format!("{} — {}", request.headline, slant))
    }

    async fn stakeholder_update(&self, request: &StakeholderUpdateRequest) -> Result<String> {
        Ok(match request.severity {
            Severity::High => {
                "Teams report mounting pressure on the ground; several partners are \
                 demanding immediate answers."
            }
            Severity::Medium => {
                "Stakeholders are watching closely and asking for a clearer picture of \
                 the response plan."
            }
            Severity::Low => {
                "Stakeholders note the situation but report no immediate concerns."
            }
        }
        .to_string())
    }

    async fn analyze_decision(&self, request: &DecisionAnalysisRequest) -> Result<DecisionAnalysis> {
        Ok(DecisionAnalysis {
            narrative: format!(
                "The decision to {} ripples outward; its effects will unfold over the \
                 coming updates.",
                request.decision.to_lowercase()
            ),
            reactions: vec![StakeholderReaction {
                stakeholder: "Operations Team".to_string(),
                reaction: "Awaiting further instructions.".to_string(),
            }],
        })
    }
}
