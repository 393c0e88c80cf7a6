//! Secure Credential Storage
//!
//! System-keychain storage for the API keys the exercise glue needs, with an
//! environment-variable fallback for headless and CI runs. A missing key is
//! a recoverable `NotFound`, never a panic.

use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "crisis-command";

/// Keychain key for the text-generation provider.
pub const TEXT_API_KEY: &str = "text_api_key";
/// Keychain key for the voice/call provider.
pub const VOICE_API_KEY: &str = "voice_api_key";

/// Environment fallbacks, checked when the keychain has no entry.
const ENV_FALLBACKS: &[(&str, &str)] = &[
    (TEXT_API_KEY, "OPENAI_API_KEY"),
    (VOICE_API_KEY, "ELEVENLABS_API_KEY"),
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    KeyringError(#[from] keyring::Error),

    #[error("Credential not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CredentialError>;

// ============================================================================
// Credential Manager
// ============================================================================

pub struct CredentialManager {
    service: String,
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialManager {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Store a raw string secret.
    pub fn store_secret(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        log::info!("Stored secret for key: {}", key);
        Ok(())
    }

    /// Retrieve a secret, falling back to the matching environment variable
    /// when the keychain has no entry.
    pub fn get_secret(&self, key: &str) -> Result<String> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => self.env_fallback(key),
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }

    /// Delete a secret. Deleting a missing entry is a no-op.
    pub fn delete_secret(&self, key: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_password() {
            Ok(()) => {
                log::info!("Deleted secret for key: {}", key);
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError::KeyringError(e)),
        }
    }

    pub fn has_secret(&self, key: &str) -> bool {
        self.get_secret(key).is_ok()
    }

    fn env_fallback(&self, key: &str) -> Result<String> {
        let var = ENV_FALLBACKS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v);
        match var.and_then(|v| std::env::var(v).ok()) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(CredentialError::NotFound(key.to_string())),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Mask an API key for display (show first 4 and last 4 chars).
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "********".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
