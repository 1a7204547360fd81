//! Localized texts spoken or shown by the assistant.

use super::state::Language;

/// Every user-facing sentence in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrasebook {
    /// Introduction spoken on the first tap.
    pub greeting: &'static str,
    /// Short prompt spoken right before capture starts.
    pub listening: &'static str,
    /// Shown next to the quick-question catalog.
    pub help: &'static str,
    /// The backend failed or timed out.
    pub backend_error: &'static str,
    /// The capture adapter reported an error.
    pub capture_error: &'static str,
    /// The capture finished with nothing but whitespace.
    pub no_question: &'static str,
    /// Speech synthesis of an answer failed.
    pub output_error: &'static str,
    /// Confirmation spoken after switching to this language.
    pub language_switched: &'static str,
}

const ENGLISH: Phrasebook = Phrasebook {
    greeting: "Hello! I'm your AI farming assistant. I can help you with plant health, \
               diseases, pesticides, fertilizers, weather advice, and crop management. \
               Single tap to speak with me, or long press for quick options. \
               What would you like to know about farming?",
    listening: "I'm listening to your farming question. Please speak clearly.",
    help: "You can ask any farming related question. I will help with plant care, \
           disease diagnosis, pest control, and crop management.",
    backend_error: "I am having trouble answering your question. Please try again later.",
    capture_error: "I had trouble hearing you. Please try again.",
    no_question: "I did not hear any question. Please try again.",
    output_error: "Sorry, I could not speak the answer. Please try again.",
    language_switched: "Language switched to English",
};

const HINDI: Phrasebook = Phrasebook {
    greeting: "नमस्ते! मैं आपकी AI कृषि सहायक हूं। मैं पौधों के स्वास्थ्य, बीमारियों, \
               कीटनाशकों, उर्वरकों, मौसम की सलाह और फसल प्रबंधन में आपकी सहायता कर सकती हूं। \
               बोलने के लिए एक बार टैप करें, या विकल्पों के लिए लॉन्ग प्रेस करें। \
               खेती के बारे में आप क्या जानना चाहते हैं?",
    listening: "मैं आपके कृषि प्रश्न को ध्यान से सुन रही हूं। कृपया स्पष्ट रूप से बोलें।",
    help: "आप कोई भी कृषि संबंधी प्रश्न पूछ सकते हैं। मैं पौधों की देखभाल, बीमारी निदान, \
           कीट नियंत्रण, और फसल प्रबंधन में मदद करूंगी।",
    backend_error: "मुझे आपके प्रश्न का उत्तर देने में समस्या हो रही है। कृपया बाद में पुनः प्रयास करें।",
    capture_error: "मुझे आपकी आवाज़ सुनने में समस्या हो रही है। कृपया पुनः प्रयास करें।",
    no_question: "मुझे कोई प्रश्न सुनाई नहीं दिया। कृपया पुनः प्रयास करें।",
    output_error: "क्षमा करें, मैं उत्तर बोल नहीं सकी। कृपया पुनः प्रयास करें।",
    language_switched: "भाषा हिंदी में बदल गई है",
};

/// The phrasebook for `language`.
pub fn phrases(language: Language) -> &'static Phrasebook {
    match language {
        Language::Primary => &ENGLISH,
        Language::Secondary => &HINDI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_devanagari(s: &str) -> bool {
        s.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
    }

    #[test]
    fn secondary_phrases_are_in_devanagari() {
        let p = phrases(Language::Secondary);
        for text in [
            p.greeting,
            p.listening,
            p.help,
            p.backend_error,
            p.capture_error,
            p.no_question,
            p.output_error,
            p.language_switched,
        ] {
            assert!(has_devanagari(text), "not Devanagari: {text}");
        }
    }

    #[test]
    fn primary_phrases_are_latin() {
        let p = phrases(Language::Primary);
        assert!(!has_devanagari(p.greeting));
        assert_eq!(p.language_switched, "Language switched to English");
    }

    #[test]
    fn continuation_lines_collapse_whitespace() {
        // `\` line continuations must not leave runs of spaces in spoken text.
        assert!(!phrases(Language::Primary).greeting.contains("  "));
        assert!(!phrases(Language::Secondary).greeting.contains("  "));
    }
}
