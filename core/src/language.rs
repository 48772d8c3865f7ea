//! Supported languages, script detection and built-in sample questions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language every question and answer is routed through around the grounded backend.
pub const PIVOT_LANGUAGE: Language = Language::English;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    English,
    Hindi,
    Bengali,
    Gujarati,
    Kannada,
    Malayalam,
    Marathi,
    Odia,
    Punjabi,
    Tamil,
    Telugu,
    Urdu,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Marathi,
        Language::Odia,
        Language::Punjabi,
        Language::Tamil,
        Language::Telugu,
        Language::Urdu,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.code() == normalized)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Marathi => "mr",
            Language::Odia => "or",
            Language::Punjabi => "pa",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Urdu => "ur",
        }
    }

    /// Name used when instructing a completion model which language to answer in.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi (हिन्दी)",
            Language::Bengali => "Bengali (বাংলা)",
            Language::Gujarati => "Gujarati (ગુજરાતી)",
            Language::Kannada => "Kannada (ಕನ್ನಡ)",
            Language::Malayalam => "Malayalam (മലയാളം)",
            Language::Marathi => "Marathi (मराठी)",
            Language::Odia => "Odia (ଓଡ଼ିଆ)",
            Language::Punjabi => "Punjabi (ਪੰਜਾਬੀ)",
            Language::Tamil => "Tamil (தமிழ்)",
            Language::Telugu => "Telugu (తెలుగు)",
            Language::Urdu => "Urdu (اردو)",
        }
    }

    fn script_range(&self) -> Option<(char, char)> {
        match self {
            Language::English => None,
            Language::Hindi | Language::Marathi => Some(('\u{0900}', '\u{097F}')),
            Language::Bengali => Some(('\u{0980}', '\u{09FF}')),
            Language::Punjabi => Some(('\u{0A00}', '\u{0A7F}')),
            Language::Gujarati => Some(('\u{0A80}', '\u{0AFF}')),
            Language::Odia => Some(('\u{0B00}', '\u{0B7F}')),
            Language::Tamil => Some(('\u{0B80}', '\u{0BFF}')),
            Language::Telugu => Some(('\u{0C00}', '\u{0C7F}')),
            Language::Kannada => Some(('\u{0C80}', '\u{0CFF}')),
            Language::Malayalam => Some(('\u{0D00}', '\u{0D7F}')),
            Language::Urdu => Some(('\u{0600}', '\u{06FF}')),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::from_code(&value).ok_or_else(|| format!("unsupported language code '{value}'"))
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

/// Guesses the language from the Unicode block of the text.
///
/// Devanagari resolves to Hindi, never Marathi. Text without any Indic or
/// Perso-Arabic characters is reported as English.
pub fn detect_language(text: &str) -> Language {
    const DETECTION_ORDER: [Language; 11] = [
        Language::Hindi,
        Language::Bengali,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Marathi,
        Language::Tamil,
        Language::Telugu,
        Language::Urdu,
        Language::Punjabi,
        Language::Odia,
    ];

    for language in DETECTION_ORDER {
        if let Some((start, end)) = language.script_range() {
            if text.chars().any(|ch| (start..=end).contains(&ch)) {
                return language;
            }
        }
    }

    Language::English
}

pub fn sample_queries(language: Language) -> &'static [&'static str] {
    const ENGLISH: [&str; 5] = [
        "What are my rights as a tenant?",
        "How do I file a complaint against workplace harassment?",
        "What documents do I need for property registration?",
        "How can I get free legal aid?",
        "What are consumer protection rights?",
    ];
    const HINDI: [&str; 5] = [
        "किरायेदार के रूप में मेरे क्या अधिकार हैं?",
        "कार्यक्षेत्र में उत्पीड़न के खिलाफ शिकायत कैसे दर्ज करूं?",
        "संपत्ति पंजीकरण के लिए मुझे कौन से दस्तावेज चाहिए?",
        "मुझे मुफ्त कानूनी सहायता कैसे मिल सकती है?",
        "उपभोक्ता संरक्षण अधिकार क्या हैं?",
    ];

    match language {
        Language::Hindi => &HINDI,
        _ => &ENGLISH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Language::from_code("HI"), Some(Language::Hindi));
        assert_eq!(Language::from_code(" ta "), Some(Language::Tamil));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn every_language_round_trips_through_its_code() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
    }

    #[test]
    fn detects_scripts() {
        assert_eq!(detect_language("मेरे अधिकार"), Language::Hindi);
        assert_eq!(detect_language("আমার অধিকার"), Language::Bengali);
        assert_eq!(detect_language("என் உரிமைகள்"), Language::Tamil);
        assert_eq!(detect_language("میرے حقوق"), Language::Urdu);
        assert_eq!(detect_language("my rights"), Language::English);
    }

    #[test]
    fn serde_rejects_unsupported_codes() {
        let parsed: Result<Language, _> = serde_json::from_str("\"xx\"");
        assert!(parsed.is_err());
        let parsed: Language = serde_json::from_str("\"kn\"").expect("kn is supported");
        assert_eq!(parsed, Language::Kannada);
    }

    #[test]
    fn sample_queries_default_to_english() {
        assert_eq!(sample_queries(Language::Telugu), sample_queries(Language::English));
        assert_ne!(sample_queries(Language::Hindi), sample_queries(Language::English));
    }
}
