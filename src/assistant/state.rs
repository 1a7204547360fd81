//! Conversation state machine types and the per-controller session.
//!
//! [`AssistantState`] drives the controller.  The UI receives it through
//! [`AssistantEvent::StateChanged`](crate::assistant::AssistantEvent) to pick
//! the button colour and icon.
//!
//! [`Session`] is the only mutable value in the engine.  It is owned by a
//! single [`ConversationController`](crate::assistant::ConversationController)
//! and lives as long as that controller; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::speech::UtteranceId;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// The two conversation languages.
///
/// `Primary` is English and `Secondary` is Hindi; the BCP-47 tags sent to
/// the speech adapters come from [`SpeechConfig`](crate::config::SpeechConfig).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Primary,
    Secondary,
}

impl Language {
    /// The other language.
    ///
    /// ```
    /// use agri_voice::assistant::Language;
    ///
    /// assert_eq!(Language::Primary.toggled(), Language::Secondary);
    /// assert_eq!(Language::Secondary.toggled(), Language::Primary);
    /// ```
    pub fn toggled(self) -> Self {
        match self {
            Language::Primary => Language::Secondary,
            Language::Secondary => Language::Primary,
        }
    }

    /// Display name written in the language's own script.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Primary => "English",
            Language::Secondary => "हिंदी",
        }
    }
}

// ---------------------------------------------------------------------------
// AssistantState
// ---------------------------------------------------------------------------

/// States of the conversation engine.
///
/// ```text
/// Idle ──tap (first use)──▶ Greeting ──greeting done──▶ Listening
/// Idle ──tap──────────────▶ Listening ──final transcript──▶ Processing
///                                    ──capture error / tap──▶ Idle
/// Processing ──answer──▶ Speaking ──done / tap──▶ Idle
/// Processing ──backend error / timeout──▶ Idle
/// any ──long press──▶ Idle (catalog opened)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AssistantState {
    /// Waiting for a gesture.
    #[default]
    Idle,
    /// The first-use introduction is being spoken.
    Greeting,
    /// The listening prompt is being spoken, then speech is captured.
    Listening,
    /// Waiting for the language backend.
    Processing,
    /// The backend answer is being spoken.
    Speaking,
}

impl AssistantState {
    /// Returns `true` while a conversation cycle is in progress.
    ///
    /// ```
    /// use agri_voice::assistant::AssistantState;
    ///
    /// assert!(!AssistantState::Idle.is_busy());
    /// assert!(AssistantState::Greeting.is_busy());
    /// assert!(AssistantState::Listening.is_busy());
    /// assert!(AssistantState::Processing.is_busy());
    /// assert!(AssistantState::Speaking.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, AssistantState::Idle)
    }

    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            AssistantState::Idle => "Idle",
            AssistantState::Greeting => "Greeting",
            AssistantState::Listening => "Listening",
            AssistantState::Processing => "Thinking",
            AssistantState::Speaking => "Speaking",
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Conversation session owned by one controller.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: AssistantState,
    pub language: Language,
    /// Cleared by the first primary tap that is accepted.
    pub is_first_interaction: bool,
    /// The most recent transcript (partial or final) or quick question.
    pub last_transcript: Option<String>,
    /// Identifies the utterance whose terminal event is still expected.
    pub pending_utterance: Option<UtteranceId>,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            state: AssistantState::Idle,
            language,
            is_first_interaction: true,
            last_transcript: None,
            pending_utterance: None,
        }
    }

    /// Consume the first-interaction flag, returning its previous value.
    pub fn take_first_interaction(&mut self) -> bool {
        std::mem::replace(&mut self.is_first_interaction, false)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(AssistantState::default(), AssistantState::Idle);
    }

    #[test]
    fn labels() {
        assert_eq!(AssistantState::Idle.label(), "Idle");
        assert_eq!(AssistantState::Processing.label(), "Thinking");
        assert_eq!(AssistantState::Speaking.label(), "Speaking");
    }

    #[test]
    fn new_session_is_idle_and_first_use() {
        let session = Session::new(Language::Secondary);
        assert_eq!(session.state, AssistantState::Idle);
        assert_eq!(session.language, Language::Secondary);
        assert!(session.is_first_interaction);
        assert!(session.last_transcript.is_none());
        assert!(session.pending_utterance.is_none());
    }

    #[test]
    fn first_interaction_is_consumed_once() {
        let mut session = Session::default();
        assert!(session.take_first_interaction());
        assert!(!session.take_first_interaction());
        assert!(!session.is_first_interaction);
    }

    #[test]
    fn language_serialises_by_name() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let text = toml::to_string(&Wrapper {
            language: Language::Secondary,
        })
        .unwrap();
        assert!(text.contains("Secondary"));
        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.language, Language::Secondary);
    }
}
