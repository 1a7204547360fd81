//! Language backend module.
//!
//! This module provides:
//! * [`LanguageBackend`]: async trait implemented by every backend.
//! * [`GeminiClient`]: Gemini `generateContent` REST client.
//! * [`compose_prompt`]: farming-advisor prompt in English or Hindi.
//! * [`BackendError`]: error variants for backend queries.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use agri_voice::assistant::Language;
//! use agri_voice::config::AppConfig;
//! use agri_voice::llm::{compose_prompt, BackendQuery, GeminiClient, LanguageBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GeminiClient::from_config(&config.backend);
//!
//!     let query = BackendQuery {
//!         composed_prompt: compose_prompt("How to prevent fungal diseases in monsoon?", Language::Primary),
//!         language_tag: "en-US".into(),
//!     };
//!     match client.query(&query).await {
//!         Ok(answer) => println!("{answer}"),
//!         Err(e) => eprintln!("backend failed: {e}"),
//!     }
//! }
//! ```

pub mod backend;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{extract_answer, BackendError, BackendQuery, GeminiClient, LanguageBackend};
pub use prompt::compose_prompt;
