//! Scholar chat adapter
//!
//! Conversational assistant backed by the chat-tuned model. Replies degrade
//! to a reassuring static message rather than an error when every attempt is
//! exhausted.

use super::gemini::{classify_gemini, GeminiClient};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::gemini::{GeminiContent, GeminiRequest, GenerationConfig};
use std::sync::Arc;
use std::time::Duration;

const SCHOLAR_INSTRUCTION: &str = "You are the Deen Scholar, a knowledgeable and compassionate Islamic assistant.

IDENTITY & CORE RULES:
1. **Knowledge Source**: Base answers on the Quran and authentic Sunnah (Hadith).
2. **Tone**: Polite, respectful, clear, and wise (Hikmah).
3. **Formatting**: Use Markdown, bolding, and blockquotes for scriptural texts.";

const UNAVAILABLE_REPLY: &str = "I am momentarily unavailable. Please remember that patience (Sabr) is a virtue. Try your question again in a moment.";

const EMPTY_REPLY: &str = "I apologize, I could not generate a response at this time.";

const DEFAULT_TITLE: &str = "New Conversation";

/// One turn of conversation history
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// "user" or "model"
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            content: content.into(),
        }
    }
}

/// Chat assistant service
pub struct ScholarService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    chat_model: String,
    fast_model: String,
}

impl ScholarService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            policy: settings.retry_policy(),
            chat_model: settings.chat_model.clone(),
            fast_model: settings.fast_model.clone(),
        }
    }

    /// Generate a reply to `message` given prior conversation turns.
    pub async fn chat_reply(&self, history: &[ChatTurn], message: &str) -> String {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|turn| match turn.role.as_str() {
                "model" => GeminiContent::model(turn.content.as_str()),
                _ => GeminiContent::user(turn.content.as_str()),
            })
            .collect();
        contents.push(GeminiContent::user(message));

        let request = GeminiRequest {
            contents,
            system_instruction: Some(GeminiContent::system(SCHOLAR_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                ..Default::default()
            }),
            ..Default::default()
        };

        let reply = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.chat_model, &request)
                    .await
                    .map(|r| r.text())
            },
            Some(UNAVAILABLE_REPLY.to_string()),
        )
        .await
        .unwrap_or_else(|_| UNAVAILABLE_REPLY.to_string());

        if reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            reply
        }
    }

    /// Generate a short title for a conversation from its first message.
    /// Cheaper and less patient than a chat reply.
    pub async fn chat_title(&self, first_message: &str) -> String {
        let request = GeminiRequest::prompt(format!(
            "Generate a 4-word title for: \"{}\". Return ONLY text.",
            first_message
        ));

        let policy = self
            .policy
            .clone()
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(500));

        let title = with_resilience(
            self.client.pool(),
            &policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.fast_model, &request)
                    .await
                    .map(|r| r.text())
            },
            Some(DEFAULT_TITLE.to_string()),
        )
        .await
        .unwrap_or_else(|_| DEFAULT_TITLE.to_string());

        let title = title.trim();
        if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        }
    }
}
