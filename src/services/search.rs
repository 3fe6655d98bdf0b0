//! Search adapters
//!
//! Topic search over Quran and Hadith via structured-output prompts, plus
//! grounded web search and nearby-places lookup via the built-in tools.
//! List searches degrade to an empty result, never an error.

use super::gemini::{classify_gemini, GeminiClient, GeminiError};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::domain::{GroundedAnswer, Hadith, QuranVerse};
use crate::schemas::gemini::{
    GeminiContent, GeminiRequest, GenerationConfig, Tool, ToolConfig,
};
use crate::utils::{safe_parse, truncate_str};
use serde_json::json;
use std::sync::Arc;

/// Search service over scripture and the grounded tools
pub struct SearchService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    fast_model: String,
    grounded_model: String,
}

impl SearchService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            policy: settings.retry_policy(),
            fast_model: settings.fast_model.clone(),
            grounded_model: settings.grounded_model.clone(),
        }
    }

    /// Find Quranic verses about a topic.
    pub async fn search_verses(&self, query: &str) -> Vec<QuranVerse> {
        tracing::info!(query = %truncate_str(query, 80), "searching verses");

        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "Find 5 Quranic verses for topic: \"{}\". Return JSON.",
                query
            ))],
            generation_config: Some(GenerationConfig::json_with_schema(verse_schema())),
            ..Default::default()
        };

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
            Some(String::new()),
        )
        .await
        .unwrap_or_default();

        safe_parse(&text, Vec::new())
    }

    /// Find authentic Hadiths about a topic.
    pub async fn search_hadiths(&self, query: &str) -> Vec<Hadith> {
        tracing::info!(query = %truncate_str(query, 80), "searching hadiths");

        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "Find 5 authentic Hadiths for topic: \"{}\". Return JSON.",
                query
            ))],
            generation_config: Some(GenerationConfig::json_with_schema(hadith_schema())),
            ..Default::default()
        };

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
            Some(String::new()),
        )
        .await
        .unwrap_or_default();

        safe_parse(&text, Vec::new())
    }

    /// Research a topic with grounded web search.
    pub async fn web_search(&self, query: &str) -> Result<GroundedAnswer, GeminiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "Research Islamic information: \"{}\". Use Search.",
                query
            ))],
            tools: Some(vec![Tool::google_search()]),
            ..Default::default()
        };

        let response = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.fast_model, &request)
                    .await
            },
            None,
        )
        .await?;

        Ok(GroundedAnswer {
            text: response.text(),
            chunks: response.grounding_chunks(),
        })
    }

    /// Find real places (mosques, halal restaurants) near the coordinates.
    /// Returns the raw grounding chunks; their shape is tool-defined.
    pub async fn find_places(
        &self,
        query: &str,
        latitude: f64,
        longitude: f64,
        location_name: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, GeminiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "Search for real {} near {}. Lat: {}, Lng: {}. USE Google Maps.",
                query,
                location_name.unwrap_or("current area"),
                latitude,
                longitude
            ))],
            tools: Some(vec![Tool::google_maps()]),
            tool_config: Some(ToolConfig::at(latitude, longitude)),
            ..Default::default()
        };

        let response = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.grounded_model, &request)
                    .await
            },
            None,
        )
        .await?;

        Ok(response.grounding_chunks())
    }
}

fn verse_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "surahName": {"type": "STRING"},
                "verseNumber": {"type": "INTEGER"},
                "arabicText": {"type": "STRING"},
                "translation": {"type": "STRING"},
                "explanation": {"type": "STRING"}
            },
            "required": ["surahName", "verseNumber", "arabicText", "translation", "explanation"]
        }
    })
}

fn hadith_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "book": {"type": "STRING"},
                "hadithNumber": {"type": "STRING"},
                "chapter": {"type": "STRING"},
                "arabicText": {"type": "STRING"},
                "translation": {"type": "STRING"},
                "explanation": {"type": "STRING"},
                "grade": {"type": "STRING"}
            },
            "required": ["book", "hadithNumber", "chapter", "arabicText", "translation", "explanation", "grade"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_require_every_field() {
        for schema in [verse_schema(), hadith_schema()] {
            let required = schema["items"]["required"].as_array().unwrap();
            let properties = schema["items"]["properties"].as_object().unwrap();
            assert_eq!(required.len(), properties.len());
        }
    }
}
