//! Services module
//!
//! The Gemini REST client plus the feature adapters built on top of it.
//! Every adapter follows one shape: build a request, pass the remote call
//! through the resilient invoker, shape the response through the JSON safety
//! net. None of them carries retry logic of its own.

pub mod gemini;
pub mod imagery;
pub mod inspiration;
pub mod scholar;
pub mod search;
pub mod speech;
pub mod study;

pub use gemini::{classify_gemini, GeminiClient, GeminiError};
pub use imagery::ImageryService;
pub use inspiration::InspirationService;
pub use scholar::{ChatTurn, ScholarService};
pub use search::SearchService;
pub use speech::SpeechService;
pub use study::StudyService;
