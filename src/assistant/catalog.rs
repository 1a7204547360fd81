//! Quick-question catalog.
//!
//! A static, read-only list of example questions per language.  The long
//! press gesture publishes the list for the current language; selecting an
//! entry feeds its text to the controller exactly as if it had been the final
//! capture result.

use super::state::Language;

const QUESTIONS_PRIMARY: &[&str] = &[
    "My plants have yellow leaves, what should I do?",
    "Which organic pesticide is best for aphids?",
    "How often should I water my tomato plants?",
    "What fertilizer is good for vegetable garden?",
    "How to prevent fungal diseases in monsoon?",
];

const QUESTIONS_SECONDARY: &[&str] = &[
    "मेरे पौधों के पत्ते पीले हो रहे हैं, क्या करूं?",
    "माहूं के लिए कौन सा जैविक कीटनाशक सबसे अच्छा है?",
    "टमाटर के पौधों को कितनी बार पानी देना चाहिए?",
    "सब्जी के बगीचे के लिए कौन सा उर्वरक अच्छा है?",
    "मानसून में फफूंदी रोगों को कैसे रोकें?",
];

/// Ordered example questions for both languages.
///
/// # Example
/// ```rust
/// use agri_voice::assistant::{Language, QuickQuestionCatalog};
///
/// let catalog = QuickQuestionCatalog::builtin();
/// assert_eq!(catalog.questions(Language::Primary).len(), 5);
/// assert!(catalog.get(Language::Primary, 99).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuickQuestionCatalog {
    primary: &'static [&'static str],
    secondary: &'static [&'static str],
}

impl QuickQuestionCatalog {
    /// The catalog shipped with the assistant.
    pub const fn builtin() -> Self {
        Self {
            primary: QUESTIONS_PRIMARY,
            secondary: QUESTIONS_SECONDARY,
        }
    }

    /// All questions for `language`, in display order.
    pub fn questions(&self, language: Language) -> &'static [&'static str] {
        match language {
            Language::Primary => self.primary,
            Language::Secondary => self.secondary,
        }
    }

    /// The question at `index` for `language`, if any.
    pub fn get(&self, language: Language, index: usize) -> Option<&'static str> {
        self.questions(language).get(index).copied()
    }
}

impl Default for QuickQuestionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
