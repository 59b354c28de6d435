//! `encodeURI`-style escaping for result URLs.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Everything except letters, digits and `; , / ? : @ & = + $ - _ . ! ~ * ' ( ) #`.
const URI: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a full URL, leaving its structural characters intact.
/// Non-ASCII characters are encoded as their UTF-8 bytes.
pub fn encode_uri(url: &str) -> String {
    utf8_percent_encode(url, URI).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_becomes_percent_20() {
        assert_eq!(encode_uri("https://x/y z.mp3"), "https://x/y%20z.mp3");
    }

    #[test]
    fn keeps_reserved_characters() {
        let url = "https://h.example:8443/a/b;c?d=1&e=f+g#frag,$!~*'()@";
        assert_eq!(encode_uri(url), url);
    }

    #[test]
    fn encodes_non_ascii_as_utf8() {
        assert_eq!(
            encode_uri("https://x/音乐.mp3"),
            "https://x/%E9%9F%B3%E4%B9%90.mp3"
        );
    }

    #[test]
    fn percent_sign_is_encoded() {
        assert_eq!(encode_uri("https://x/50%.mp3"), "https://x/50%25.mp3");
    }
}
