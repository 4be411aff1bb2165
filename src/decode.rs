//! Form (`application/x-www-form-urlencoded`) and URL path decoding.
//!
//! In form data `+` becomes a space; paths keep `+` as is. In both, every
//! well-formed `%XX` escape becomes its byte.
//! A `%` that is not followed by two hex digits is kept literally, so decoding
//! never fails. Bytes that do not form valid UTF-8 after decoding are replaced
//! with U+FFFD.

use percent_encoding::percent_decode;
use std::borrow::Cow;

/// Decode a form-encoded byte span.
///
/// ```
/// use paramtree::decode::decode_form;
///
/// assert_eq!(decode_form(b"m%40rried+5+time%24"), "m@rried 5 time$");
/// assert_eq!(decode_form(b"100%"), "100%");
/// ```
pub fn decode_form(input: &[u8]) -> String {
    if !needs_decoding(input) {
        return String::from_utf8_lossy(input).into_owned();
    }

    let spaced: Cow<'_, [u8]> = if input.contains(&b'+') {
        Cow::Owned(
            input
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    };

    percent_decode(&spaced).decode_utf8_lossy().into_owned()
}

/// Decode a form-encoded string. Shorthand for [`decode_form`] on its bytes.
pub fn decode_form_str(input: &str) -> String {
    decode_form(input.as_bytes())
}

/// Decode a percent-encoded URL path. Unlike [`decode_form`], `+` is kept.
///
/// ```
/// use paramtree::decode::decode_path;
///
/// assert_eq!(decode_path(b"/files/a+b%20c.txt"), "/files/a+b c.txt");
/// ```
pub fn decode_path(input: &[u8]) -> String {
    percent_decode(input).decode_utf8_lossy().into_owned()
}

fn needs_decoding(input: &[u8]) -> bool {
    input.iter().any(|&b| b == b'%' || b == b'+')
}
