//! Utility modules
//!
//! Contains safe JSON decoding for model output and small string helpers.

pub mod json;
pub mod string;

pub use json::{extract_json, safe_parse, safe_parse_opt};
pub use string::truncate_str;
