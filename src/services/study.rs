//! Study adapters
//!
//! Reflections, supplications, insights, dream interpretation, and quiz
//! generation. These return `Ok(None)` when the model answered but the
//! payload could not be decoded, and propagate only terminal remote errors.

use super::gemini::{classify_gemini, GeminiClient, GeminiError};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::domain::{
    DhikrSuggestion, DreamResult, GeneratedDua, NameInsight, QuizQuestion, Reflection,
};
use crate::schemas::gemini::GeminiRequest;
use crate::utils::{safe_parse, safe_parse_opt};
use std::sync::Arc;

/// Study and reflection service
pub struct StudyService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    fast_model: String,
}

impl StudyService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            policy: settings.retry_policy(),
            fast_model: settings.fast_model.clone(),
        }
    }

    /// Spiritual reflection (tadabbur) on a verse.
    pub async fn tadabbur(
        &self,
        surah: &str,
        verse_number: u32,
    ) -> Result<Option<Reflection>, GeminiError> {
        self.json_request(format!(
            "Spiritual Tadabbur for {}:{}. Return JSON with verseReference, english, urdu, \
             hinglish keys; each language holds paragraph and points.",
            surah, verse_number
        ))
        .await
    }

    /// Commentary (sharh) on a hadith.
    pub async fn sharh(
        &self,
        book: &str,
        hadith_number: &str,
    ) -> Result<Option<Reflection>, GeminiError> {
        self.json_request(format!(
            "Spiritual Sharh for {} Hadith {}. Return JSON with hadithReference, english, \
             urdu, hinglish keys; each language holds paragraph and points.",
            book, hadith_number
        ))
        .await
    }

    /// A dua composed for the user's situation.
    pub async fn personalized_dua(
        &self,
        situation: &str,
    ) -> Result<Option<GeneratedDua>, GeminiError> {
        self.json_request(format!(
            "Beautiful Dua for: \"{}\". Return JSON with title, arabic, transliteration, \
             translation.",
            situation
        ))
        .await
    }

    /// A dhikr suited to how the user feels.
    pub async fn dhikr_suggestion(
        &self,
        feeling: &str,
    ) -> Result<Option<DhikrSuggestion>, GeminiError> {
        self.json_request(format!(
            "Dhikr for: \"{}\". Return JSON with arabic, transliteration, meaning, benefit, \
             target.",
            feeling
        ))
        .await
    }

    /// Insight into one of the names of Allah.
    pub async fn name_insight(&self, name: &str) -> Result<Option<NameInsight>, GeminiError> {
        self.json_request(format!(
            "Insight for: \"{}\". Return JSON with name and english, urdu, hinglish keys; \
             each holds meaning, reflection, application.",
            name
        ))
        .await
    }

    /// Islamic interpretation of a dream.
    pub async fn interpret_dream(&self, dream: &str) -> Result<Option<DreamResult>, GeminiError> {
        self.json_request(format!(
            "Interpret dream: \"{}\". Return JSON with english, urdu, hinglish keys; each \
             holds interpretation, symbols, advice.",
            dream
        ))
        .await
    }

    /// Generate a multiple-choice quiz. Decode failures yield an empty quiz.
    pub async fn generate_quiz(
        &self,
        topic: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<Vec<QuizQuestion>, GeminiError> {
        let request = GeminiRequest::json_prompt(format!(
            "Generate {} {} MCQ questions about {}. Return a JSON array; each item holds \
             question, options, correctIndex, explanation.",
            count, difficulty, topic
        ));

        let text = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.fast_model, &request)
                    .await
                    .map(|r| r.text())
            },
            None,
        )
        .await?;

        Ok(safe_parse(&text, Vec::new()))
    }

    /// Shared path: JSON prompt on the fast model, decode-or-None.
    async fn json_request<T: serde::de::DeserializeOwned>(
        &self,
        prompt: String,
    ) -> Result<Option<T>, GeminiError> {
        let request = GeminiRequest::json_prompt(prompt);

        let text = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.fast_model, &request)
                    .await
                    .map(|r| r.text())
            },
            None,
        )
        .await?;

        Ok(safe_parse_opt(&text))
    }
}
