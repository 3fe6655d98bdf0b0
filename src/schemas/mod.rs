//! Schema definitions
//!
//! Wire formats for the Gemini REST API and the typed domain results the
//! feature adapters shape model output into.

pub mod domain;
pub mod gemini;

pub use domain::{
    DailyInspiration, DhikrSuggestion, DreamResult, GeneratedDua, GroundedAnswer, Hadith,
    LocalizedInsight, NameInsight, QuizQuestion, QuranVerse, Reflection, ReflectionContent,
};
pub use gemini::{
    Candidate, GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig, ImageConfig,
    InlineData, LatLng, Part, RetrievalConfig, Tool, ToolConfig,
};
