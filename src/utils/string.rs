//! String helpers

/// Truncate a string to at most `max_chars` characters, appending an ellipsis
/// when anything was cut. Operates on characters, not bytes, so multi-byte
/// text (Arabic, Urdu) is never split mid-codepoint.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_untouched() {
        assert_eq!(truncate_str("bismillah", 20), "bismillah");
    }

    #[test]
    fn test_long_string_truncated() {
        assert_eq!(truncate_str("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_multibyte_safe() {
        let arabic = "بسم الله الرحمن الرحيم";
        let truncated = truncate_str(arabic, 7);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 10);
    }
}
