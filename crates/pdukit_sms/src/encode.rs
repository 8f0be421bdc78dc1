//! URL-safe encoding of cell text.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes escaped by [`encode_uri_component`].
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ( )`. Unlike the browser
/// `encodeURIComponent` unreserved set, `'` is escaped too, so neither quote
/// character ever survives literally.
pub const SET_URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `text` as UTF-8 with uppercase hex escapes.
///
/// `'` renders as `%27` and `"` as `%22`.
pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, SET_URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_encode_keeps_unreserved_literal() {
        assert_eq!(encode_uri_component("Hello"), "Hello");
        assert_eq!(
            encode_uri_component("AZaz09-_.!~*()"),
            "AZaz09-_.!~*()"
        );
        assert_eq!(encode_uri_component(""), "");
    }

    #[test]
    fn test_encode_reserved_and_unicode() {
        assert_eq!(encode_uri_component("a b"), "a%20b");
        assert_eq!(encode_uri_component("a@b.com"), "a%40b.com");
        assert_eq!(encode_uri_component("50% off"), "50%25%20off");
        assert_eq!(encode_uri_component("x=1&y=2"), "x%3D1%26y%3D2");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
        assert_eq!(encode_uri_component("€"), "%E2%82%AC");
        assert_eq!(encode_uri_component("👋"), "%F0%9F%91%8B");
    }

    #[test]
    fn test_encode_quotes() {
        assert_eq!(encode_uri_component("John's"), "John%27s");
        assert_eq!(encode_uri_component("say \"hi\""), "say%20%22hi%22");
        assert_eq!(
            encode_uri_component("Dear John's Café — 50% off!"),
            "Dear%20John%27s%20Caf%C3%A9%20%E2%80%94%2050%25%20off!"
        );
    }

    proptest! {
        #[test]
        fn prop_encoded_never_contains_quotes(txt in "\\PC*") {
            let encoded = encode_uri_component(&txt);
            prop_assert!(!encoded.contains('\''));
            prop_assert!(!encoded.contains('"'));
            prop_assert!(encoded.is_ascii());
        }
    }
}
