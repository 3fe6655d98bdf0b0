//! Failure classification
//!
//! Remote AI clients do not expose a stable typed error taxonomy, so
//! classification is best-effort inspection of a status code and the error's
//! display string. The brittle matching lives here, in one swappable table,
//! rather than scattered across call sites.

use std::fmt::Display;

/// Message substrings that mark a failure as recoverable by rotate-and-retry.
/// "requested entity was not found" covers stale routing of a model that is
/// available under a different key.
const TRANSIENT_MARKERS: &[&str] = &[
    "429",
    "quota",
    "exhausted",
    "overloaded",
    "unavailable",
    "rate limit",
    "requested entity was not found",
];

/// How a failed attempt should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Recoverable by rotating to the next key and retrying within budget
    Transient,
    /// Not worth retrying: bad request shape, permanent auth rejection,
    /// logic errors in the wrapped operation
    Terminal,
}

impl ErrorClass {
    pub fn is_transient(self) -> bool {
        self == ErrorClass::Transient
    }
}

/// Classify by HTTP status alone. Returns `None` for statuses where the
/// message has to decide.
pub fn classify_status(status: u16) -> Option<ErrorClass> {
    match status {
        429 => Some(ErrorClass::Transient),
        s if s >= 500 => Some(ErrorClass::Transient),
        400 | 401 | 403 => Some(ErrorClass::Terminal),
        _ => None,
    }
}

/// Classify by display string against the marker table.
pub fn classify_message<E: Display>(err: &E) -> ErrorClass {
    let message = err.to_string().to_lowercase();
    if TRANSIENT_MARKERS.iter().any(|m| message.contains(m)) {
        ErrorClass::Transient
    } else {
        ErrorClass::Terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status(429), Some(ErrorClass::Transient));
        assert_eq!(classify_status(500), Some(ErrorClass::Transient));
        assert_eq!(classify_status(503), Some(ErrorClass::Transient));
        assert_eq!(classify_status(400), Some(ErrorClass::Terminal));
        assert_eq!(classify_status(401), Some(ErrorClass::Terminal));
        assert_eq!(classify_status(404), None);
    }

    #[test]
    fn test_quota_messages_are_transient() {
        for msg in [
            "429 Too Many Requests",
            "Resource has been exhausted",
            "Quota exceeded for quota metric",
            "The model is overloaded",
            "Service Unavailable",
            "Requested entity was not found",
        ] {
            assert_eq!(classify_message(&msg), ErrorClass::Transient, "{}", msg);
        }
    }

    #[test]
    fn test_other_messages_are_terminal() {
        for msg in [
            "Invalid request: missing contents",
            "API key not valid. Please pass a valid API key.",
            "deserialization failed",
        ] {
            assert_eq!(classify_message(&msg), ErrorClass::Terminal, "{}", msg);
        }
    }
}
