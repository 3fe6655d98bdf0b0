//! Safe decoding of structured model output
//!
//! The model is asked for JSON but may wrap it in markdown fences, prepend
//! prose, or truncate the payload mid-token. Decode failures never escape this
//! boundary; malformed output degrades to the caller's fallback value.

use serde::de::DeserializeOwned;

/// Strip markdown code fences and surrounding prose, keeping the slice from
/// the first opening brace/bracket to the last closing one.
///
/// Returns the input unchanged (trimmed) when no JSON-looking region exists,
/// letting the decode step report the failure.
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();

    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.strip_suffix("```").unwrap_or(rest))
        .unwrap_or(trimmed)
        .trim();

    let start = inner.find(['{', '[']);
    let end = inner.rfind(['}', ']']);
    match (start, end) {
        (Some(s), Some(e)) if e >= s => &inner[s..=e],
        _ => inner,
    }
}

/// Decode structured model output, substituting `fallback` on any failure.
pub fn safe_parse<T: DeserializeOwned>(raw: &str, fallback: T) -> T {
    match serde_json::from_str(extract_json(raw)) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "discarding undecodable model output");
            fallback
        }
    }
}

/// Decode structured model output, returning `None` on any failure.
pub fn safe_parse_opt<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(extract_json(raw)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
        count: u32,
    }

    #[test]
    fn test_parses_plain_json() {
        let parsed: Item = safe_parse(r#"{"name":"tasbih","count":33}"#, fallback());
        assert_eq!(parsed.name, "tasbih");
        assert_eq!(parsed.count, 33);
    }

    #[test]
    fn test_strips_markdown_fences() {
        let raw = "```json\n{\"name\":\"tasbih\",\"count\":33}\n```";
        let parsed: Item = safe_parse(raw, fallback());
        assert_eq!(parsed.count, 33);
    }

    #[test]
    fn test_strips_surrounding_prose() {
        let raw = "Here is the result you asked for:\n{\"name\":\"tasbih\",\"count\":33}\nHope this helps!";
        let parsed: Item = safe_parse(raw, fallback());
        assert_eq!(parsed.name, "tasbih");
    }

    #[test]
    fn test_prose_returns_fallback() {
        let parsed: Item = safe_parse("I could not produce JSON for that request.", fallback());
        assert_eq!(parsed, fallback());
    }

    #[test]
    fn test_truncated_json_returns_fallback() {
        let parsed: Item = safe_parse(r#"{"name":"tasbih","cou"#, fallback());
        assert_eq!(parsed, fallback());
    }

    #[test]
    fn test_empty_input_returns_fallback() {
        let parsed: Vec<Item> = safe_parse("", Vec::new());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_safe_parse_opt() {
        assert_eq!(safe_parse_opt::<Item>("not json"), None);
        assert!(safe_parse_opt::<Item>(r#"{"name":"x","count":1}"#).is_some());
    }

    #[test]
    fn test_extract_json_array() {
        assert_eq!(extract_json("```\n[1,2,3]\n```"), "[1,2,3]");
    }

    fn fallback() -> Item {
        Item {
            name: "fallback".to_string(),
            count: 0,
        }
    }
}
