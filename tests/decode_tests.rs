// tests/decode_tests.rs

use paramtree::decode::{decode_form, decode_form_str, decode_path};

#[test]
fn test_plain_text_is_unchanged() {
    let test_cases = vec!["", "ross", "a-b_c.d~e", "ünïcode"];

    for input in test_cases {
        assert_eq!(decode_form_str(input), input, "Failed for input: {}", input);
    }
}

#[test]
fn test_plus_is_space() {
    assert_eq!(decode_form_str("a+b++c"), "a b  c");
}

#[test]
fn test_percent_escapes() {
    let test_cases = vec![
        ("m%40rried+5+time%24", "m@rried 5 time$"),
        ("%3D%26", "=&"),
        ("%2b", "+"),
        ("%2B", "+"),
        ("%5B%5D", "[]"),
        ("caf%C3%A9", "café"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(decode_form_str(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_malformed_escapes_pass_through() {
    let test_cases = vec![
        ("100%", "100%"),
        ("%", "%"),
        ("%4", "%4"),
        ("%zz", "%zz"),
        ("%G1x", "%G1x"),
        ("a%2", "a%2"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(decode_form_str(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_decoded_plus_is_not_a_space() {
    assert_eq!(decode_form_str("%2B+"), "+ ");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    assert_eq!(decode_form_str("%FF"), "\u{FFFD}");
    assert_eq!(decode_form(b"ok\xFF"), "ok\u{FFFD}");
}

#[test]
fn test_output_is_never_longer() {
    for input in ["%41%42%43", "a+b", "%", "plain"] {
        assert!(decode_form_str(input).len() <= input.len(), "Failed for input: {}", input);
    }
}

#[test]
fn test_path_decoding_keeps_plus() {
    let test_cases = vec![
        ("/users/ross", "/users/ross"),
        ("/a+b", "/a+b"),
        ("/a%20b", "/a b"),
        ("/a%2Bb", "/a+b"),
        ("/caf%C3%A9", "/café"),
        ("/100%", "/100%"),
        ("/%zz", "/%zz"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(decode_path(input.as_bytes()), expected, "Failed for input: {}", input);
    }
}
