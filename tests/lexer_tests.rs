// tests/lexer_tests.rs

use paramtree::lexer::{PathLexer, tokenize_key};
use paramtree::path::PathSegment;
use paramtree::{ErrorKind, ParamsError};

fn name(s: &str) -> PathSegment {
    PathSegment::Name(s.to_string())
}

fn segments(input: &str) -> Vec<PathSegment> {
    tokenize_key(input, 6).unwrap().segments().to_vec()
}

// ============================================================================
// Plain Names
// ============================================================================

#[test]
fn test_plain_names() {
    let test_cases = vec!["name", "a", "user_name", "with space", "m%40il", "üñï"];

    for input in test_cases {
        let path = tokenize_key(input, 6).unwrap();
        assert_eq!(path.segments(), &[name(input)], "Failed for input: {}", input);
        assert!(path.is_plain());
        assert_eq!(path.root(), input);
        assert_eq!(path.raw(), input);
    }
}

#[test]
fn test_closing_bracket_in_plain_name() {
    assert_eq!(segments("a]b"), vec![name("a]b")]);
}

// ============================================================================
// Bracket Groups
// ============================================================================

#[test]
fn test_anonymous_group() {
    assert_eq!(segments("names[]"), vec![name("names"), PathSegment::Anonymous]);
}

#[test]
fn test_named_group() {
    assert_eq!(segments("users[name]"), vec![name("users"), name("name")]);
}

#[test]
fn test_mixed_groups() {
    assert_eq!(
        segments("users[][data][id]"),
        vec![name("users"), PathSegment::Anonymous, name("data"), name("id")]
    );
    assert_eq!(
        segments("a[][]"),
        vec![name("a"), PathSegment::Anonymous, PathSegment::Anonymous]
    );
}

#[test]
fn test_group_contents_are_literal() {
    assert_eq!(segments("a[b c]"), vec![name("a"), name("b c")]);
    assert_eq!(segments("a[%5B]"), vec![name("a"), name("%5B")]);
    assert_eq!(segments("a[b[c]"), vec![name("a"), name("b[c")]);
}

#[test]
fn test_leading_bracket_belongs_to_name() {
    assert_eq!(
        segments("[ross][]"),
        vec![name("[ross]"), PathSegment::Anonymous]
    );
    assert_eq!(segments("[]"), vec![name("[]")]);
}

#[test]
fn test_characters_between_groups_are_skipped() {
    assert_eq!(segments("a[b]xyz[c]"), vec![name("a"), name("b"), name("c")]);
    assert_eq!(segments("a[b]tail"), vec![name("a"), name("b")]);
}

#[test]
fn test_depth_counts_leading_name() {
    assert_eq!(tokenize_key("a", 6).unwrap().depth(), 1);
    assert_eq!(tokenize_key("a[b][]", 6).unwrap().depth(), 3);
}

#[test]
fn test_display_shows_raw_name() {
    let path = tokenize_key("users[][id]", 6).unwrap();
    assert_eq!(path.to_string(), "users[][id]");
}

#[test]
fn test_segment_accessors() {
    assert_eq!(name("id").name(), Some("id"));
    assert!(!name("id").is_anonymous());
    assert_eq!(PathSegment::Anonymous.name(), None);
    assert!(PathSegment::Anonymous.is_anonymous());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_bracket() {
    let test_cases = vec!["names[", "names[abc", "a[b][", "a[][c"];

    for input in test_cases {
        let err = tokenize_key(input, 6).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParams, "Failed for input: {}", input);
        match err {
            ParamsError::BadParams { key } => assert_eq!(key, input),
            other => panic!("expected BadParams, got {:?}", other),
        }
    }
}

#[test]
fn test_empty_name() {
    assert_eq!(tokenize_key("", 6).unwrap_err().kind(), ErrorKind::BadParams);
}

#[test]
fn test_depth_limit() {
    assert!(tokenize_key("a[1][2][3][4][5]", 6).is_ok());

    let err = tokenize_key("a[1][2][3][4][5][6]", 6).unwrap_err();
    match err {
        ParamsError::TooDeep { key, max_depth } => {
            assert_eq!(key, "a[1][2][3][4][5][6]");
            assert_eq!(max_depth, 6);
        }
        other => panic!("expected TooDeep, got {:?}", other),
    }
}

#[test]
fn test_depth_limit_wins_over_unterminated_bracket() {
    let err = tokenize_key("a[][][][][][", 6).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooDeep);
}

#[test]
fn test_small_depth_limits() {
    assert_eq!(tokenize_key("a", 0).unwrap_err().kind(), ErrorKind::TooDeep);
    assert!(tokenize_key("a", 1).is_ok());
    assert_eq!(tokenize_key("a[]", 1).unwrap_err().kind(), ErrorKind::TooDeep);
}

#[test]
fn test_lexer_struct_matches_helper() {
    let mut lexer = PathLexer::new("x[][y]", 6);
    assert_eq!(lexer.tokenize().unwrap(), tokenize_key("x[][y]", 6).unwrap());
}
