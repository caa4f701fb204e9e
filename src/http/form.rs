//! Form body decoding module
//!
//! Decodes `application/x-www-form-urlencoded` request bodies.

use std::collections::HashMap;

/// Decode a form-encoded body into a field map.
///
/// Repeated fields keep the last value.
pub fn parse(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fields() {
        let fields = parse(b"username=alice&message=hello");
        assert_eq!(fields.get("username").map(String::as_str), Some("alice"));
        assert_eq!(fields.get("message").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_parse_percent_and_plus_decoding() {
        let fields = parse(b"message=hello+world%21");
        assert_eq!(
            fields.get("message").map(String::as_str),
            Some("hello world!")
        );
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse(b"").is_empty());
    }

    #[test]
    fn test_parse_repeated_field_last_wins() {
        let fields = parse(b"username=first&username=second");
        assert_eq!(fields.get("username").map(String::as_str), Some("second"));
    }
}
