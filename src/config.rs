use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub exercise: ExerciseConfig,
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
}

/// Exercise pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    /// Session length in minutes.
    pub duration_minutes: i64,
    /// Tick interval in milliseconds for the session loop.
    pub tick_rate_ms: u64,
    /// Default scenario id when none is chosen.
    pub default_scenario: String,
}

/// Text-generation provider configuration. The API key lives in the
/// keychain, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    /// Override for OpenAI-compatible servers.
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Voice provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Conversational agent id for journalist calls.
    pub agent_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exercise: ExerciseConfig::default(),
            llm: LlmConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            tick_rate_ms: 1000,
            default_scenario: "data-breach".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self { agent_id: None }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/crisis-command/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("crisis-command").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
