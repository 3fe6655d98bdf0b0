//! Gemini REST client
//!
//! Thin client for the `generateContent` endpoint. The active API key is
//! fetched from the pool on every request, so a rotation between attempts
//! takes effect on the next attempt without rebuilding the client.

use crate::invoke::{classify_message, classify_status, ErrorClass};
use crate::pool::{KeyPool, PoolError};
use crate::schemas::gemini::{ErrorBody, GeminiRequest, GeminiResponse};
use crate::utils::truncate_str;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl GeminiError {
    /// Numeric status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GeminiError::Api { status, .. } => Some(*status),
            GeminiError::Http(err) => err.status().map(|s| s.as_u16()),
            GeminiError::Pool(_) => None,
        }
    }
}

/// Classifier for Gemini failures, used by every adapter in this crate.
///
/// An empty key pool is terminal: retrying without a key cannot succeed.
/// Transport-level timeouts and connection failures are transient. Everything
/// else is decided by status code first, message markers second.
pub fn classify_gemini(err: &GeminiError) -> ErrorClass {
    match err {
        GeminiError::Pool(_) => ErrorClass::Terminal,
        GeminiError::Http(e) if e.is_timeout() || e.is_connect() => ErrorClass::Transient,
        _ => err
            .status()
            .and_then(classify_status)
            .unwrap_or_else(|| classify_message(err)),
    }
}

/// Client for the Gemini generateContent API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    pool: Arc<KeyPool>,
}

impl GeminiClient {
    /// Create a new client over the given key pool.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        pool: Arc<KeyPool>,
    ) -> Result<Self, GeminiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            pool,
        })
    }

    /// The key pool this client draws from.
    pub fn pool(&self) -> &KeyPool {
        &self.pool
    }

    /// Call generateContent on `model` with the currently active key.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, GeminiError> {
        let api_key = self.pool.active_key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, "calling generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) => truncate_str(&body, 200),
            };
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GeminiResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_status_is_transient() {
        let err = GeminiError::Api {
            status: 429,
            message: "Quota exceeded".to_string(),
        };
        assert_eq!(classify_gemini(&err), ErrorClass::Transient);
    }

    #[test]
    fn test_server_errors_are_transient() {
        for status in [500, 502, 503] {
            let err = GeminiError::Api {
                status,
                message: "internal".to_string(),
            };
            assert_eq!(classify_gemini(&err), ErrorClass::Transient);
        }
    }

    #[test]
    fn test_bad_request_is_terminal() {
        let err = GeminiError::Api {
            status: 400,
            message: "Invalid request".to_string(),
        };
        assert_eq!(classify_gemini(&err), ErrorClass::Terminal);
    }

    #[test]
    fn test_invalid_key_is_terminal() {
        let err = GeminiError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(classify_gemini(&err), ErrorClass::Terminal);
    }

    #[test]
    fn test_stale_routing_404_is_transient() {
        // The status alone does not decide 404; the message marker does.
        let err = GeminiError::Api {
            status: 404,
            message: "Requested entity was not found.".to_string(),
        };
        assert_eq!(classify_gemini(&err), ErrorClass::Transient);
    }

    #[test]
    fn test_empty_pool_is_terminal() {
        let err = GeminiError::Pool(PoolError::Empty);
        assert_eq!(classify_gemini(&err), ErrorClass::Terminal);
    }
}
