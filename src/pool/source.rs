//! Key sourcing and sanitization
//!
//! Deployment environments supply key material in two conventions, sometimes
//! both at once: a single variable holding a comma-joined list, and discretely
//! numbered variables. Both merge into one deduplicated pool.

use std::env;

/// Primary environment variable. May hold one key or a comma-joined list.
pub const PRIMARY_KEY_VAR: &str = "GEMINI_API_KEY";

/// Highest numbered variant checked (`GEMINI_API_KEY1`..`GEMINI_API_KEY5`).
pub const NUMBERED_KEY_VARS: u32 = 5;

/// Where a pool's keys come from.
///
/// `Env` re-reads the process environment on every refresh, which covers
/// configuration that becomes available after startup. `Fixed` never changes
/// and is meant for tests and embedded use.
#[derive(Debug, Clone)]
pub enum KeySource {
    Env,
    Fixed(Vec<String>),
}

impl KeySource {
    /// Load, sanitize, and deduplicate the current key material.
    pub fn load(&self) -> Vec<String> {
        match self {
            KeySource::Env => {
                let mut raw = Vec::new();
                if let Ok(primary) = env::var(PRIMARY_KEY_VAR) {
                    raw.push(primary);
                }
                for i in 1..=NUMBERED_KEY_VARS {
                    if let Ok(value) = env::var(format!("{}{}", PRIMARY_KEY_VAR, i)) {
                        raw.push(value);
                    }
                }
                collect_keys(&raw)
            }
            KeySource::Fixed(keys) => collect_keys(keys),
        }
    }
}

/// Strip quoting and whitespace artifacts introduced by deployment tooling:
/// quotes, literal `\n` escapes, and any whitespace (keys never contain it).
pub fn sanitize_key(raw: &str) -> String {
    raw.replace(['"', '\''], "")
        .replace("\\n", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Split each raw value on commas, sanitize every piece, drop empties, and
/// deduplicate preserving first-seen order.
pub fn collect_keys<S: AsRef<str>>(raw_values: &[S]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for raw in raw_values {
        for piece in raw.as_ref().split(',') {
            let clean = sanitize_key(piece);
            if !clean.is_empty() && !keys.contains(&clean) {
                keys.push(clean);
            }
        }
    }
    keys
}
