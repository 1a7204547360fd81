//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::assistant::Language;

/// Environment variable that overrides [`BackendConfig::api_key`].
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Settings for the remote generative-text backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Model identifier used in the `:generateContent` path.
    pub model: String,
    /// API key sent as the `key` query parameter.
    ///
    /// `None` here means "read `GEMINI_API_KEY` from the environment".
    pub api_key: Option<String>,
    /// Maximum seconds to wait for an answer before giving up.
    pub timeout_secs: u64,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    /// Keeps spoken answers short.
    pub max_output_tokens: u32,
    /// Threshold applied to every safety category, e.g. `BLOCK_MEDIUM_AND_ABOVE`.
    pub safety_threshold: String,
}

impl BackendConfig {
    /// The API key to use: the environment variable wins over the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-pro".into(),
            api_key: None,
            timeout_secs: 20,
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 200,
            safety_threshold: "BLOCK_MEDIUM_AND_ABOVE".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Language tags and voice parameters handed to the speech adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// BCP-47 tag for [`Language::Primary`] (English).
    pub primary_tag: String,
    /// BCP-47 tag for [`Language::Secondary`] (Hindi).
    pub secondary_tag: String,
    /// Speaking rate multiplier; 1.0 is the platform default.
    pub rate: f32,
    pub pitch: f32,
}

impl SpeechConfig {
    /// BCP-47 tag for `language`.
    pub fn tag_for(&self, language: Language) -> &str {
        match language {
            Language::Primary => &self.primary_tag,
            Language::Secondary => &self.secondary_tag,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            primary_tag: "en-US".into(),
            secondary_tag: "hi-IN".into(),
            rate: 0.8,
            pitch: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// AssistantConfig
// ---------------------------------------------------------------------------

/// Conversation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Language the session starts in.
    pub language: Language,
    /// Speak the introduction on the very first tap.
    pub greet_on_first_use: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            language: Language::Primary,
            greet_on_first_use: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use agri_voice::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.backend.timeout_secs > 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub speech: SpeechConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
