// tests/cli_tests.rs

#![cfg(feature = "cli")]

use std::fs;
use std::io::Cursor;

use paramtree::cli::{CliError, MultipartOptions, QueryOptions, execute_multipart, execute_query};
use paramtree::output::{file_to_json, to_json, to_json_pretty, to_json_value};
use paramtree::{FileHandle, FileRef, ParseOptions, Value, parse_query};
use serde_json::json;

fn query_options(query: &str) -> QueryOptions {
    QueryOptions {
        query: Some(query.to_string()),
        ..QueryOptions::default()
    }
}

fn multipart_options(boundary: &str) -> MultipartOptions {
    MultipartOptions {
        boundary: boundary.to_string(),
        ..MultipartOptions::default()
    }
}

const BODY: &[u8] = b"--B\r\n\
    Content-Disposition: form-data; name=\"user[name]\"\r\n\r\n\
    ross\r\n\
    --B\r\n\
    Content-Disposition: form-data; name=\"user[avatar]\"; filename=\"r.txt\"\r\n\
    Content-Type: text/plain\r\n\r\n\
    dinosaurs\r\n\
    --B--\r\n";

// ============================================================================
// Query Command
// ============================================================================

#[test]
fn test_execute_query() {
    let output = execute_query(&query_options("users[][name]=ross&users[][name]=joey")).unwrap();
    assert_eq!(output, json!({"users": [{"name": "ross"}, {"name": "joey"}]}));
}

#[test]
fn test_execute_query_strips_question_mark_and_newline() {
    let output = execute_query(&query_options("?a=1&b[]=2\n")).unwrap();
    assert_eq!(output, json!({"a": "1", "b": ["2"]}));
}

#[test]
fn test_execute_query_urlencoded() {
    let options = QueryOptions {
        urlencoded: true,
        ..query_options("a%3D1%26b%5B%5D%3D2")
    };
    assert_eq!(execute_query(&options).unwrap(), json!({"a": "1", "b": ["2"]}));
}

#[test]
fn test_execute_query_without_input() {
    let err = execute_query(&QueryOptions::default()).unwrap_err();
    assert!(matches!(err, CliError::NoInput));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_rejected_query_exits_with_one() {
    for query in ["a[=1", "a[b]=1&a[]=2"] {
        let err = execute_query(&query_options(query)).unwrap_err();
        assert!(matches!(err, CliError::Params(_)), "{}", query);
        assert_eq!(err.exit_code(), 1);
    }
}

#[test]
fn test_query_depth_option() {
    let options = QueryOptions {
        parse: ParseOptions::default().with_max_depth(2),
        ..query_options("a[b][c]=1")
    };
    let err = execute_query(&options).unwrap_err();
    assert!(err.to_string().starts_with("Params too deep"));
}

// ============================================================================
// Multipart Command
// ============================================================================

#[test]
fn test_execute_multipart_in_memory() {
    let output = execute_multipart(Cursor::new(BODY), &multipart_options("B")).unwrap();
    assert_eq!(
        output,
        json!({"user": {
            "name": "ross",
            "avatar": {"filename": "r.txt", "content_type": "text/plain", "size": 9, "handle": 0}
        }})
    );
}

#[test]
fn test_execute_multipart_with_upload_dir() {
    let dir = tempfile::tempdir().unwrap();
    let options = MultipartOptions {
        upload_dir: Some(dir.path().to_path_buf()),
        ..multipart_options("B")
    };

    let output = execute_multipart(Cursor::new(BODY), &options).unwrap();
    let avatar = &output["user"]["avatar"];
    assert_eq!(avatar["size"], json!(9));

    let path = avatar["path"].as_str().unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "dinosaurs");
}

#[test]
fn test_malformed_multipart_exits_with_one() {
    let err = execute_multipart(Cursor::new(&BODY[..20]), &multipart_options("B")).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Malformed multipart request"));
}

#[test]
fn test_rejected_multipart_leaves_no_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let options = MultipartOptions {
        upload_dir: Some(dir.path().to_path_buf()),
        ..multipart_options("B")
    };
    let body = b"--B\r\n\
        Content-Disposition: form-data; name=\"doc\"; filename=\"secret.txt\"\r\n\r\n\
        secret\r\n\
        --B\r\n\
        Content-Disposition: form-data; name=\"param[\"\r\n\r\n\
        1\r\n\
        --B--\r\n";

    let err = execute_multipart(Cursor::new(&body[..]), &options).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Bad params"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_upload_dir_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let options = MultipartOptions {
        upload_dir: Some(dir.path().join("missing")),
        ..multipart_options("B")
    };

    let err = execute_multipart(Cursor::new(BODY), &options).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_json_output_keeps_key_order() {
    let params = parse_query("zeta=1&alpha[]=2&mid[b]=3&mid[a]=&empty", &ParseOptions::default()).unwrap();
    assert_eq!(
        to_json(&params),
        r#"{"zeta":"1","alpha":["2"],"mid":{"b":"3","a":""},"empty":null}"#
    );
}

#[test]
fn test_pretty_output() {
    let params = parse_query("a[]=1", &ParseOptions::default()).unwrap();
    assert_eq!(to_json_pretty(&params), "{\n  \"a\": [\n    \"1\"\n  ]\n}");
}

#[test]
fn test_file_rendering() {
    let file = FileRef {
        filename: "a.bin".to_string(),
        content_type: None,
        size: 3,
        handle: FileHandle(7),
    };
    let expected = json!({"filename": "a.bin", "content_type": null, "size": 3, "handle": 7});
    assert_eq!(file_to_json(&file), expected);
    assert_eq!(to_json_value(&Value::File(file)), expected);
}
