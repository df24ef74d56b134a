//! Language detection for extracted text.

use crate::types::Language;

/// Classify text as Arabic if any character falls in the Arabic block
/// (U+0600..=U+06FF), otherwise English. Missing text is English.
pub fn detect(text: Option<&str>) -> Language {
    match text {
        Some(text) if text.chars().any(is_arabic) => Language::Ar,
        _ => Language::En,
    }
}

fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        assert_eq!(detect(Some("Photosynthesis converts light")), Language::En);
    }

    #[test]
    fn test_detect_single_arabic_char() {
        assert_eq!(detect(Some("Chapter 1: ب")), Language::Ar);
        assert_eq!(detect(Some("التمثيل الضوئي")), Language::Ar);
    }

    #[test]
    fn test_detect_block_bounds() {
        assert_eq!(detect(Some("\u{0600}")), Language::Ar);
        assert_eq!(detect(Some("\u{06FF}")), Language::Ar);
        assert_eq!(detect(Some("\u{05FF}")), Language::En);
        assert_eq!(detect(Some("\u{0700}")), Language::En);
    }

    #[test]
    fn test_detect_empty_and_missing() {
        assert_eq!(detect(None), Language::En);
        assert_eq!(detect(Some("")), Language::En);
    }

    #[test]
    fn test_detect_is_referentially_transparent() {
        let text = "mixed نص text";
        let first = detect(Some(text));
        assert!((0..5).all(|_| detect(Some(text)) == first));
    }
}
