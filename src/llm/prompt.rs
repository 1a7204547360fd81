//! Prompt composer for farming questions.
//!
//! [`compose_prompt`] prefixes the farmer's literal question with a fixed
//! advisor preamble written in the question's language, so the backend
//! answers in the same script.  The answer is meant to be spoken, so the
//! preamble asks for two or three sentences.

use crate::assistant::Language;

// ---------------------------------------------------------------------------
// Preambles
// ---------------------------------------------------------------------------

const PREAMBLE_PRIMARY: &str = "\
You are an expert agricultural advisor. Answer the farmer's question with:
- Practical and actionable advice
- Focus on Indian farming practices
- Suggest both organic and chemical solutions when appropriate
- Include safety guidelines
- Keep response to 2-3 sentences for voice delivery
- Be specific about dosages, timing, and methods";

const QUESTION_LABEL_PRIMARY: &str = "Farmer's question:";

const PREAMBLE_SECONDARY: &str = "\
आप एक विशेषज्ञ कृषि सलाहकार हैं। किसान के प्रश्न का उत्तर दें:
- व्यावहारिक और क्रियान्वित करने योग्य सलाह दें
- स्थानीय भारतीय कृषि पद्धतियों पर ध्यान दें
- जैविक और रासायनिक दोनों समाधान सुझाएं
- सुरक्षा दिशानिर्देशों को शामिल करें
- उत्तर 2-3 वाक्यों में रखें";

const QUESTION_LABEL_SECONDARY: &str = "किसान का प्रश्न:";

// ---------------------------------------------------------------------------
// compose_prompt
// ---------------------------------------------------------------------------

/// Build the backend prompt for `question` in `language`.
///
/// The question is embedded verbatim.  Callers reject empty questions before
/// getting here.
///
/// # Example
/// ```rust
/// use agri_voice::assistant::Language;
/// use agri_voice::llm::compose_prompt;
///
/// let prompt = compose_prompt("Which organic pesticide is best for aphids?", Language::Primary);
/// assert!(prompt.starts_with("You are an expert agricultural advisor."));
/// assert!(prompt.ends_with("Farmer's question: Which organic pesticide is best for aphids?"));
/// ```
pub fn compose_prompt(question: &str, language: Language) -> String {
    let (preamble, label) = match language {
        Language::Primary => (PREAMBLE_PRIMARY, QUESTION_LABEL_PRIMARY),
        Language::Secondary => (PREAMBLE_SECONDARY, QUESTION_LABEL_SECONDARY),
    };

    let mut prompt = String::with_capacity(preamble.len() + label.len() + question.len() + 4);
    prompt.push_str(preamble);
    prompt.push_str("\n\n");
    prompt.push_str(label);
    prompt.push(' ');
    prompt.push_str(question);
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
