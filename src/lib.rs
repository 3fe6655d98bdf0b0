//! Deen Gateway library
//!
//! The AI-invocation core of an Islamic lifestyle companion: a rotating
//! API-key pool, a resilient retry/backoff invoker that rotates the pool on
//! quota failures, a safety net for structured model output, and the thin
//! feature adapters built on top.

// Public modules
pub mod config;
pub mod invoke;
pub mod logging;
pub mod pool;
pub mod schemas;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use invoke::{with_resilience, with_resilience_cancellable, ErrorClass, RetryPolicy};
pub use pool::{KeyPool, KeySource, PoolError};
pub use services::{GeminiClient, GeminiError};
