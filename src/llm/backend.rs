//! Core `LanguageBackend` trait and the Gemini `generateContent` client.
//!
//! A query is attempted exactly once.  Failures are returned to the caller,
//! which decides what the user hears; nothing here retries or substitutes a
//! canned answer.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::BackendConfig;

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Errors that can occur while asking the language backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("backend request timed out")]
    Timeout,

    /// The payload did not contain a usable answer.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("no API key configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// BackendQuery
// ---------------------------------------------------------------------------

/// One question on its way to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendQuery {
    pub composed_prompt: String,
    /// BCP-47 tag of the language the answer should be in.
    pub language_tag: String,
}

// ---------------------------------------------------------------------------
// LanguageBackend trait
// ---------------------------------------------------------------------------

/// Async trait for the remote generative-text service.
///
/// Implementors must be `Send + Sync` so they can be shared with the task
/// that runs the query (`Arc<dyn LanguageBackend>`).
#[async_trait]
pub trait LanguageBackend: Send + Sync {
    /// Ask once and return the answer text.
    async fn query(&self, query: &BackendQuery) -> Result<String, BackendError>;
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Calls `POST {base_url}/v1beta/models/{model}:generateContent`.
///
/// All connection details come from the [`BackendConfig`] passed to
/// [`GeminiClient::from_config`].
pub struct GeminiClient {
    client: reqwest::Client,
    config: BackendConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client whose every request is bounded by
    /// `config.timeout_secs`.
    ///
    /// A default (no-timeout) client is used as a last-resort fallback if
    /// the builder fails; the controller applies its own timeout on top.
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(config, client)
    }

    /// Use a pre-built HTTP client.
    pub fn with_client(config: &BackendConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: config.resolved_api_key(),
            config: config.clone(),
        }
    }

    /// Full endpoint URL, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// JSON body for `prompt`.
    pub fn request_body(&self, prompt: &str) -> Value {
        let safety: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| {
                serde_json::json!({
                    "category":  category,
                    "threshold": self.config.safety_threshold,
                })
            })
            .collect();

        serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature":     self.config.temperature,
                "topK":            self.config.top_k,
                "topP":            self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
            },
            "safetySettings": safety,
        })
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
///
/// Anything else, including an answer that is only whitespace, is a
/// [`BackendError::MalformedResponse`].
pub fn extract_answer(json: &Value) -> Result<String, BackendError> {
    let text = json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| {
            BackendError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
        })?
        .trim();

    if text.is_empty() {
        return Err(BackendError::MalformedResponse("empty answer text".into()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl LanguageBackend for GeminiClient {
    async fn query(&self, query: &BackendQuery) -> Result<String, BackendError> {
        let key = self.api_key.as_deref().ok_or(BackendError::MissingApiKey)?;
        let body = self.request_body(&query.composed_prompt);

        log::debug!(
            "backend: querying {} ({} chars, {})",
            self.config.model,
            query.composed_prompt.len(),
            query.language_tag
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let json: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::MalformedResponse(e.to_string())
            }
        })?;

        extract_answer(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
