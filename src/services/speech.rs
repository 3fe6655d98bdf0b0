//! Speech synthesis adapter
//!
//! Text-to-speech through the TTS-tuned model. The model returns raw PCM
//! samples base64-encoded in an inline data part; playback is the caller's
//! concern.

use super::gemini::{classify_gemini, GeminiClient, GeminiError};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::gemini::{GeminiContent, GeminiRequest, GenerationConfig};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use std::sync::Arc;

const VOICE_NAME: &str = "Puck";

/// Text-to-speech service
pub struct SpeechService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    tts_model: String,
}

impl SpeechService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            policy: settings.retry_policy(),
            tts_model: settings.tts_model.clone(),
        }
    }

    /// Synthesize `text` into PCM bytes. `Ok(None)` when the model returned
    /// no audio or an undecodable payload.
    pub async fn synthesize(&self, text: &str) -> Result<Option<Vec<u8>>, GeminiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user(text)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(json!({
                    "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": VOICE_NAME}}
                })),
                ..Default::default()
            }),
            ..Default::default()
        };

        let response = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.tts_model, &request)
                    .await
            },
            None,
        )
        .await?;

        let Some(inline) = response.first_inline_data() else {
            return Ok(None);
        };

        match STANDARD.decode(&inline.data) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) => {
                tracing::debug!(error = %err, "discarding undecodable audio payload");
                Ok(None)
            }
        }
    }
}
