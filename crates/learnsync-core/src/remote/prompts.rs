//! Prompt templates for extraction and study-material generation.

use crate::types::Language;

/// Instruction sent with an inline image for OCR.
pub const OCR_INSTRUCTION: &str = "Perform OCR on this image. Extract all text visible, including handwritten notes. If there is an Arabic text, extract it accurately.";

/// Instruction sent with an uploaded PDF.
pub const PDF_INSTRUCTION: &str =
    "Please extract all the text and key information from this PDF precisely.";

/// Instruction sent with an uploaded audio or video recording.
pub const TRANSCRIPTION_INSTRUCTION: &str =
    "Please provide a detailed and accurate transcription of the speech in this media.";

/// Longest prefix of `text` holding at most `budget` characters.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Summary plus key concepts in a single call.
pub fn analysis_prompt(text: &str, language: Language) -> String {
    format!(
        "You are an educational assistant. Analyze the following text {lang}.\n\
         1. Provide a concise summary.\n\
         2. Extract 5-7 key concepts with definitions.\n\
         Return ONLY a JSON object with this structure: \
         {{\"summary\": \"...\", \"concepts\": [{{ \"term\": \"...\", \"definition\": \"...\" }}]}}\n\n\
         Text: {text}",
        lang = language.instruction(),
        text = text,
    )
}

pub fn quiz_prompt(text: &str, language: Language, num_questions: usize) -> String {
    format!(
        "You are an educational quiz generator. Create {n} multiple-choice questions {lang} \
         based on the provided text. Return ONLY valid JSON array: \
         [{{\"id\": 1, \"question\": \"...\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"correct_answer_index\": 0}}]\n\n\
         Text: {text}",
        n = num_questions,
        lang = language.instruction(),
        text = text,
    )
}

pub fn flashcards_prompt(text: &str, language: Language, num_cards: usize) -> String {
    format!(
        "You are an educational flashcard generator. Create {n} flashcards {lang} with \
         term/definition pairs. Return ONLY valid JSON array: \
         [{{\"term\": \"...\", \"definition\": \"...\"}}]\n\n\
         Text: {text}",
        n = num_cards,
        lang = language.instruction(),
        text = text,
    )
}
