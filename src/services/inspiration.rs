//! Daily inspiration adapter
//!
//! One short Ayah or Hadith per calendar day, cached so the home screen does
//! not re-fetch on every visit. A day whose every fetch attempt fails shows a
//! fixed Quranic fallback rather than an error.

use super::gemini::{classify_gemini, GeminiClient};
use crate::config::Settings;
use crate::invoke::{with_resilience, RetryPolicy};
use crate::schemas::domain::DailyInspiration;
use crate::schemas::gemini::GeminiRequest;
use crate::utils::safe_parse;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Daily inspiration service with a per-day cache
pub struct InspirationService {
    client: Arc<GeminiClient>,
    policy: RetryPolicy,
    fast_model: String,
    cache: Cache<String, DailyInspiration>,
}

impl InspirationService {
    pub fn new(client: Arc<GeminiClient>, settings: &Settings) -> Self {
        Self {
            client,
            // Fewer attempts than the default: the fallback is always acceptable.
            policy: settings
                .retry_policy()
                .with_max_attempts(3)
                .with_initial_delay(Duration::from_millis(1000)),
            fast_model: settings.fast_model.clone(),
            cache: Cache::builder()
                .max_capacity(4)
                .time_to_live(Duration::from_secs(24 * 60 * 60))
                .build(),
        }
    }

    /// Today's inspiration, fetched at most once per calendar day.
    pub async fn daily(&self) -> DailyInspiration {
        let today = chrono::Local::now().date_naive().to_string();
        self.cache
            .get_with(today.clone(), self.fetch(today))
            .await
    }

    async fn fetch(&self, today: String) -> DailyInspiration {
        let request = GeminiRequest::json_prompt(format!(
            "Provide one unique, short, inspiring Ayah or Hadith for today ({}). Variety is \
             essential. Avoid repeating the same common verses. Return JSON with 'type', \
             'text', 'source'.",
            today
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
            Some(String::new()),
        )
        .await
        .unwrap_or_default();

        safe_parse(&text, DailyInspiration::fallback())
    }
}
