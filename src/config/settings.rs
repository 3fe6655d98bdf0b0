//! Application settings
//!
//! Loads configuration from environment variables with sensible defaults.
//! Key material itself is owned by the key pool (`pool::KeySource`), not by
//! settings; this covers models, timeouts, and retry knobs.

use crate::invoke::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Retry configuration knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            multiplier: 2.0,
            jitter: false,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub log_level: String,

    // Gemini endpoint
    pub gemini_base_url: String,
    pub request_timeout_seconds: u64,

    // Model selection per task
    pub chat_model: String,
    pub fast_model: String,
    pub grounded_model: String,
    pub tts_model: String,
    pub image_model: String,
    pub pro_image_model: String,

    // Retry behavior
    pub retry: RetrySettings,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if present (ignored in production typically)
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("APP_NAME", "deen-gateway"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env_or_default("LOG_LEVEL", "info"),

            gemini_base_url: env_or_default(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            request_timeout_seconds: env_or_default("REQUEST_TIMEOUT_SECONDS", "120")
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECONDS value")?,

            chat_model: env_or_default("CHAT_MODEL", "gemini-3-pro-preview"),
            fast_model: env_or_default("FAST_MODEL", "gemini-3-flash-preview"),
            grounded_model: env_or_default("GROUNDED_MODEL", "gemini-2.5-flash"),
            tts_model: env_or_default("TTS_MODEL", "gemini-2.5-flash-preview-tts"),
            image_model: env_or_default("IMAGE_MODEL", "gemini-2.5-flash-image"),
            pro_image_model: env_or_default("PRO_IMAGE_MODEL", "gemini-3-pro-image-preview"),

            retry: RetrySettings {
                max_attempts: env_or_default("RETRY_MAX_ATTEMPTS", "4")
                    .parse()
                    .unwrap_or(4),
                initial_delay_ms: env_or_default("RETRY_INITIAL_DELAY_MS", "1000")
                    .parse()
                    .unwrap_or(1000),
                max_delay_ms: env_or_default("RETRY_MAX_DELAY_MS", "30000")
                    .parse()
                    .unwrap_or(30_000),
                multiplier: env_or_default("RETRY_MULTIPLIER", "2.0")
                    .parse()
                    .unwrap_or(2.0),
                jitter: env_or_default("RETRY_JITTER", "false")
                    .parse()
                    .unwrap_or(false),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("request_timeout_seconds must be > 0");
        }
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry max_attempts must be > 0");
        }
        if self.retry.multiplier < 1.0 {
            anyhow::bail!("retry multiplier must be >= 1.0 (delays must not shrink)");
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            anyhow::bail!("retry max_delay_ms must be >= initial_delay_ms");
        }
        Ok(())
    }

    /// Build the retry policy described by these settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(self.retry.max_attempts)
            .with_initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .with_multiplier(self.retry.multiplier)
            .with_jitter(self.retry.jitter)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "deen-gateway".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_seconds: 120,
            chat_model: "gemini-3-pro-preview".to_string(),
            fast_model: "gemini-3-flash-preview".to_string(),
            grounded_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            pro_image_model: "gemini-3-pro-image-preview".to_string(),
            retry: RetrySettings::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "deen-gateway");
        assert_eq!(settings.request_timeout_seconds, 120);
        assert_eq!(settings.retry.max_attempts, 4);
    }

    #[test]
    fn test_retry_policy_from_settings() {
        let mut settings = Settings::default();
        settings.retry.max_attempts = 3;
        settings.retry.initial_delay_ms = 500;
        settings.retry.multiplier = 1.5;

        let policy = settings.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.multiplier, 1.5);
    }

    #[test]
    fn test_validate_rejects_shrinking_delays() {
        let mut settings = Settings::default();
        settings.retry.multiplier = 0.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut settings = Settings::default();
        settings.retry.max_attempts = 0;
        assert!(settings.validate().is_err());
    }
}
