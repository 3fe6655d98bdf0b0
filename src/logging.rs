//! Tracing initialization
//!
//! Console subscriber with an env-filter; JSON output for deployments that
//! ship logs, human-readable otherwise.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Safe to call once;
/// subsequent calls are ignored (useful when tests race to initialize).
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber was already initialized");
    }
}
