//! Google Gemini API schema definitions
//!
//! Rust structures for the Gemini REST `generateContent` request and response
//! formats, limited to the surface this crate actually sends and reads.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Request body for generateContent
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// The content of the conversation
    pub contents: Vec<GeminiContent>,

    /// System instruction (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,

    /// Generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    /// Tool declarations (grounded search, maps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    /// Tool configuration (e.g. retrieval coordinates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

impl GeminiRequest {
    /// Single-turn user prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent::user(text)],
            ..Default::default()
        }
    }

    /// Single-turn user prompt expecting a JSON reply
    pub fn json_prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent::user(text)],
            generation_config: Some(GenerationConfig::json()),
            ..Default::default()
        }
    }
}

/// Content block containing role and parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role: "user" or "model"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl GeminiContent {
    /// Create a user content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model content
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a system instruction (no role)
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// A part of the content: text or inline binary data
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline data (images, audio)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Create an inline data part
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Inline binary content, base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (e.g. "image/png", "audio/pcm")
    pub mime_type: String,

    /// Base64-encoded data
    pub data: String,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Requested response MIME type ("application/json" for structured output)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Structured output schema, passed through as raw JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,

    /// Response modalities (e.g. ["AUDIO"] for speech synthesis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,

    /// Speech synthesis configuration, passed through as raw JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<serde_json::Value>,

    /// Image generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Image generation knobs
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// e.g. "16:9", "1:1"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,

    /// e.g. "2K"; only honored by the pro image model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

impl GenerationConfig {
    /// Config requesting structured JSON output
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }

    /// Config requesting JSON output matching `schema`
    pub fn json_with_schema(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }
}

/// Tool declaration. Empty objects enable the built-in grounded tools.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps: Option<serde_json::Value>,
}

impl Tool {
    pub fn google_search() -> Self {
        Self {
            google_search: Some(serde_json::json!({})),
            ..Default::default()
        }
    }

    pub fn google_maps() -> Self {
        Self {
            google_maps: Some(serde_json::json!({})),
            ..Default::default()
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_config: Option<RetrievalConfig>,
}

/// Retrieval configuration for location-aware tools
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: LatLng,
}

/// Geographic coordinates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl ToolConfig {
    /// Retrieval config anchored at the given coordinates
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            retrieval_config: Some(RetrievalConfig {
                lat_lng: LatLng {
                    latitude,
                    longitude,
                },
            }),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response body from generateContent
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// A response candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<GeminiContent>,

    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Grounding metadata attached to tool-assisted answers
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Source chunks backing the answer; shape varies per tool, kept raw
    #[serde(default)]
    pub grounding_chunks: Vec<serde_json::Value>,
}

impl GeminiResponse {
    /// Concatenated text of all parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// First inline data payload of the first candidate, if any.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
    }

    /// Grounding chunks of the first candidate.
    pub fn grounding_chunks(&self) -> Vec<serde_json::Value> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// Error body
// ============================================================================

/// Error envelope the API returns on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail inside the envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
