//! Small parsing helpers.

use serde::de::DeserializeOwned;

/// Outcome of [`parse_or_default`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOr<T> {
    /// `raw` was JSON decodable as `T`.
    Parsed(T),
    /// `raw` was not; it is returned untouched.
    Raw(String),
}

impl<T> ParsedOr<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            ParsedOr::Parsed(value) => Some(value),
            ParsedOr::Raw(_) => None,
        }
    }
}

/// Decode `raw` as JSON into `T`, falling back to the raw text.
pub fn parse_or_default<T: DeserializeOwned>(raw: &str) -> ParsedOr<T> {
    match serde_json::from_str(raw) {
        Ok(value) => ParsedOr::Parsed(value),
        Err(_) => ParsedOr::Raw(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_parses_json() {
        let parsed: ParsedOr<HashMap<String, String>> = parse_or_default(r#"{"name":"taken"}"#);
        let map = parsed.parsed().unwrap();
        assert_eq!(map.get("name").map(String::as_str), Some("taken"));
    }

    #[test]
    fn test_falls_back_to_raw() {
        let parsed: ParsedOr<HashMap<String, String>> = parse_or_default("not json {");
        assert_eq!(parsed, ParsedOr::Raw("not json {".to_string()));
    }

    #[test]
    fn test_shape_mismatch_is_raw() {
        let parsed: ParsedOr<HashMap<String, String>> = parse_or_default(r#""just a string""#);
        assert_eq!(parsed, ParsedOr::Raw(r#""just a string""#.to_string()));
    }
}
