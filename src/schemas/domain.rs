//! Typed domain results
//!
//! Shapes the feature adapters decode structured model output into. Field
//! names are camelCase on the wire because that is what the model is prompted
//! to produce.

use serde::{Deserialize, Serialize};

/// A Quranic verse returned by topic search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuranVerse {
    pub surah_name: String,
    pub verse_number: u32,
    pub arabic_text: String,
    pub translation: String,
    pub explanation: String,
}

/// An authenticated Hadith returned by topic search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hadith {
    pub book: String,
    pub hadith_number: String,
    pub chapter: String,
    pub arabic_text: String,
    pub translation: String,
    pub explanation: String,
    pub grade: String,
}

/// A generated supplication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDua {
    pub title: String,
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
}

/// One language rendition of a reflection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionContent {
    pub paragraph: String,
    #[serde(default)]
    pub points: Vec<String>,
}

/// A trilingual reflection on a verse (tadabbur) or hadith (sharh).
/// The wire field is `verseReference` or `hadithReference` depending on
/// which the model was asked for; both land in `reference`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    #[serde(alias = "verseReference", alias = "hadithReference")]
    pub reference: String,
    pub english: ReflectionContent,
    pub urdu: ReflectionContent,
    pub hinglish: ReflectionContent,
}

/// A dhikr suited to how the user says they feel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhikrSuggestion {
    pub arabic: String,
    pub transliteration: String,
    pub meaning: String,
    pub benefit: String,
    /// Suggested repetition count for the counter
    pub target: u32,
}

/// One language rendition of a name insight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedInsight {
    pub meaning: String,
    pub reflection: String,
    pub application: String,
}

/// Trilingual insight into one of the names of Allah
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameInsight {
    pub name: String,
    pub english: LocalizedInsight,
    pub urdu: LocalizedInsight,
    pub hinglish: LocalizedInsight,
}

/// One language rendition of a dream interpretation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamInterpretation {
    pub interpretation: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub advice: String,
}

/// Trilingual dream interpretation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamResult {
    pub english: DreamInterpretation,
    pub urdu: DreamInterpretation,
    pub hinglish: DreamInterpretation,
}

/// A multiple-choice quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

/// The daily Ayah or Hadith shown on the home screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyInspiration {
    /// "Ayah" or "Hadith"
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub source: String,
}

impl DailyInspiration {
    /// Static default shown when every fetch attempt is exhausted.
    pub fn fallback() -> Self {
        Self {
            kind: "Ayah".to_string(),
            text: "Verily, with every hardship comes ease.".to_string(),
            source: "Surah Ash-Sharh 94:5".to_string(),
        }
    }
}

/// A grounded answer: free text plus the source chunks backing it
#[derive(Debug, Clone, Serialize)]
pub struct GroundedAnswer {
    pub text: String,
    pub chunks: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_wire_format_is_camel_case() {
        let raw = serde_json::json!({
            "surahName": "Al-Fatiha",
            "verseNumber": 1,
            "arabicText": "بسم الله الرحمن الرحيم",
            "translation": "In the name of Allah...",
            "explanation": "The opening."
        });
        let verse: QuranVerse = serde_json::from_value(raw).unwrap();
        assert_eq!(verse.surah_name, "Al-Fatiha");
        assert_eq!(verse.verse_number, 1);
    }

    #[test]
    fn test_reflection_accepts_both_reference_fields() {
        let content = serde_json::json!({"paragraph": "p", "points": []});
        for field in ["verseReference", "hadithReference"] {
            let raw = serde_json::json!({
                (field): "2:255",
                "english": content.clone(),
                "urdu": content.clone(),
                "hinglish": content.clone()
            });
            let reflection: Reflection = serde_json::from_value(raw).unwrap();
            assert_eq!(reflection.reference, "2:255");
        }
    }

    #[test]
    fn test_inspiration_type_field() {
        let raw = r#"{"type":"Hadith","text":"...","source":"Bukhari"}"#;
        let inspiration: DailyInspiration = serde_json::from_str(raw).unwrap();
        assert_eq!(inspiration.kind, "Hadith");

        let fallback = DailyInspiration::fallback();
        assert_eq!(fallback.kind, "Ayah");
        assert!(fallback.source.contains("94:5"));
    }
}
