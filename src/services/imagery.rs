//! Imagery adapters
//!
//! Thumbnail generation, image editing, and media understanding. Image
//! results come back as base64 inline parts; adapters decode them to raw
//! bytes and return `Ok(None)` when the model produced no usable image.

use super::gemini::{classify_gemini, GeminiClient, GeminiError};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::gemini::{
    GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig, ImageConfig, Part,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

const NO_ANALYSIS: &str = "No analysis available.";
const NO_TRANSCRIPTION: &str = "No transcription available.";

/// Image generation and media understanding service
pub struct ImageryService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    image_model: String,
    pro_image_model: String,
    media_model: String,
}

impl ImageryService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            policy: settings.retry_policy(),
            image_model: settings.image_model.clone(),
            pro_image_model: settings.pro_image_model.clone(),
            media_model: settings.grounded_model.clone(),
        }
    }

    /// Generate an Islamic-aesthetic image for `prompt`. The size hint is
    /// only honored by the pro model.
    pub async fn generate_thumbnail(
        &self,
        prompt: &str,
        aspect_ratio: &str,
        size: Option<&str>,
        use_pro: bool,
    ) -> Result<Option<Vec<u8>>, GeminiError> {
        let model = if use_pro {
            &self.pro_image_model
        } else {
            &self.image_model
        };

        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "Islamic aesthetic art: {}",
                prompt
            ))],
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: Some(aspect_ratio.to_string()),
                    image_size: if use_pro {
                        size.map(str::to_string)
                    } else {
                        None
                    },
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let response = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async { self.client.generate_content(model, &request).await },
            None,
        )
        .await?;

        Ok(first_image_bytes(&response))
    }

    /// Edit an existing image (base64 PNG) according to `prompt`.
    pub async fn edit_image(
        &self,
        image_base64: &str,
        prompt: &str,
    ) -> Result<Option<Vec<u8>>, GeminiError> {
        let request = edit_request(image_base64, prompt);

        let response = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.image_model, &request)
                    .await
            },
            None,
        )
        .await?;

        Ok(first_image_bytes(&response))
    }

    /// Describe an uploaded file (image, audio, video) per `prompt`.
    pub async fn analyze_media(
        &self,
        file_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, GeminiError> {
        self.media_text(file_base64, mime_type, prompt, NO_ANALYSIS)
            .await
    }

    /// Transcribe an uploaded audio or video file.
    pub async fn transcribe_media(
        &self,
        file_base64: &str,
        mime_type: &str,
    ) -> Result<String, GeminiError> {
        self.media_text(file_base64, mime_type, "Transcribe this.", NO_TRANSCRIPTION)
            .await
    }

    /// Shared path: inline file plus instruction, plain-text reply.
    async fn media_text(
        &self,
        file_base64: &str,
        mime_type: &str,
        prompt: &str,
        empty_reply: &str,
    ) -> Result<String, GeminiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![Part::inline_data(mime_type, file_base64), Part::text(prompt)],
            }],
            ..Default::default()
        };

        let text = with_resilience(
            self.client.pool(),
            &self.policy,
            classify_gemini,
            || async {
                self.client
                    .generate_content(&self.media_model, &request)
                    .await
                    .map(|r| r.text())
            },
            None,
        )
        .await?;

        if text.trim().is_empty() {
            Ok(empty_reply.to_string())
        } else {
            Ok(text)
        }
    }
}

fn edit_request(image_base64: &str, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts: vec![
                Part::inline_data("image/png", image_base64),
                Part::text(prompt),
            ],
        }],
        ..Default::default()
    }
}

/// First inline payload of the response, base64-decoded. Undecodable
/// payloads are discarded, not surfaced as errors.
fn first_image_bytes(response: &GeminiResponse) -> Option<Vec<u8>> {
    let inline = response.first_inline_data()?;
    match STANDARD.decode(&inline.data) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::debug!(error = %err, "discarding undecodable image payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_request_puts_image_before_instruction() {
        let request = edit_request("QUJD", "make it calligraphy");
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "QUJD");
        assert_eq!(parts[1].text.as_deref(), Some("make it calligraphy"));
    }

    #[test]
    fn test_first_image_bytes_decodes_inline_part() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "QUJD"}}
                    ]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(first_image_bytes(&response), Some(b"ABC".to_vec()));
    }

    #[test]
    fn test_first_image_bytes_discards_bad_base64() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"mimeType": "image/png", "data": "not base64!!"}}]
                }
            }]
        });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(first_image_bytes(&response), None);
    }

    #[test]
    fn test_text_only_response_yields_no_image() {
        let raw = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "cannot draw that"}]}}]
        });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(first_image_bytes(&response), None);
    }
}
