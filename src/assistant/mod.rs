//! Conversation engine for the push-to-talk farming assistant.
//!
//! This module owns the conversation: the state machine, the session, the
//! localized phrases and the quick-question catalog.  Speech capture, speech
//! output and the language backend are reached only through the ports in
//! [`crate::speech`] and [`crate::llm`].
//!
//! # Architecture
//!
//! ```text
//! AssistantInput (mpsc) ──▶ ConversationController::run()  ← async tokio task
//!                                  │
//!                                  ├─ SpeechOutput::speak / stop_all
//!                                  ├─ SpeechCapture::start / stop
//!                                  └─ tokio::spawn(LanguageBackend::query)
//!                                  │
//! AssistantEvent (mpsc) ◀──────────┘  StateChanged, TranscriptUpdated, …
//! ```

pub mod catalog;
pub mod controller;
pub mod phrases;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use catalog::QuickQuestionCatalog;
pub use controller::{
    AssistantError, AssistantEvent, AssistantInput, BackendReply, ConversationController,
};
pub use phrases::{phrases, Phrasebook};
pub use state::{AssistantState, Language, Session};
