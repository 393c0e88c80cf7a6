//! Headless demo run: drives one scripted session against the canned
//! narrative backend (or a live provider when a key is available) and prints
//! the resulting event log.

use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;

use crisis_command::config::AppConfig;
use crisis_command::core::clock::ManualClock;
use crisis_command::core::credentials::{CredentialManager, TEXT_API_KEY};
use crisis_command::core::exercise::ExerciseSession;
use crisis_command::core::llm::narrative::{
    CannedNarrativeBackend, LlmNarrativeBackend, NarrativeBackend,
};
use crisis_command::core::llm::providers::OpenAIProvider;
use crisis_command::core::scenario::catalog;

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = crisis_command::core::logging::init();
    let config = AppConfig::load();

    let backend = narrative_backend(&config);
    let scenario = catalog::by_id(&config.exercise.default_scenario)
        .unwrap_or_else(catalog::data_breach);

    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let mut session = ExerciseSession::new(
        scenario,
        backend,
        clock.clone(),
        Duration::minutes(config.exercise.duration_minutes),
    );

    session.start()?;
    println!("=== {} ===", session.scenario().inbrief.title);
    println!("{}\n", session.scenario().inbrief.initial_situation);

    // A short scripted run: monitor, let the opening beats land, then skip
    // ahead and issue a statement.
    session.submit_decision("Monitor the situation", None).await?;
    clock.advance(Duration::minutes(6));
    session.tick();

    let burst = session.skip_time(10).await?;
    log::info!("Time skip produced {} events", burst.len());

    session
        .submit_decision(
            "Issue a public statement",
            Some("We are investigating, will address the root cause, and will be transparent about what we find."),
        )
        .await?;

    for event in session.events() {
        println!(
            "[{}] {:<12} {}",
            event.timestamp.format("%H:%M:%S"),
            event.kind.as_str(),
            event.content
        );
    }

    let state = session.state();
    println!(
        "\ntrust={} media={} morale={} severity={}",
        state.public_trust, state.media_attention, state.internal_morale, state.severity
    );

    session.end_exercise();
    Ok(())
}

/// Live backend when a text-generation key is stored; canned otherwise.
fn narrative_backend(config: &AppConfig) -> Arc<dyn NarrativeBackend> {
    let credentials = CredentialManager::new();
    match credentials.get_secret(TEXT_API_KEY) {
        Ok(api_key) => {
            let provider = match &config.llm.base_url {
                Some(base) => OpenAIProvider::with_base_url(
                    api_key,
                    config.llm.model.clone(),
                    base.clone(),
                ),
                None => OpenAIProvider::new(api_key, config.llm.model.clone()),
            };
            Arc::new(LlmNarrativeBackend::new(
                Arc::new(provider),
                config.llm.temperature,
                config.llm.max_tokens,
            ))
        }
        Err(e) => {
            log::warn!("No text-generation key ({e}); using the canned backend");
            Arc::new(CannedNarrativeBackend)
        }
    }
}
