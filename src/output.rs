//! JSON rendering of parameter trees.
//!
//! Map keys keep their first-occurrence order. Files render as an object
//! describing the stored upload:
//!
//! ```json
//! {"filename": "a.txt", "content_type": "text/plain", "size": 5, "handle": 0}
//! ```
//!
//! # Examples
//!
//! ```
//! use paramtree::{ParseOptions, parse_query};
//! use paramtree::output::{to_json, to_json_pretty};
//!
//! let params = parse_query("b=2&a[]=1", &ParseOptions::default()).unwrap();
//! assert_eq!(to_json(&params), r#"{"b":"2","a":["1"]}"#);
//! assert!(to_json_pretty(&params).contains("\n  \"b\": \"2\""));
//! ```

use serde_json::json;

use crate::value::{FileRef, Map, Value};

/// Convert a tree value into a `serde_json::Value`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    to_json_value_with(value, &file_to_json)
}

/// Convert a whole parse result into a JSON object.
pub fn map_to_json(map: &Map) -> serde_json::Value {
    map_to_json_with(map, &file_to_json)
}

/// Like [`to_json_value`], rendering file references with `render_file`.
pub fn to_json_value_with(
    value: &Value,
    render_file: &dyn Fn(&FileRef) -> serde_json::Value,
) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Scalar(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json_value_with(item, render_file))
                .collect(),
        ),
        Value::Map(map) => map_to_json_with(map, render_file),
        Value::File(file) => render_file(file),
    }
}

/// Like [`map_to_json`], rendering file references with `render_file`.
pub fn map_to_json_with(
    map: &Map,
    render_file: &dyn Fn(&FileRef) -> serde_json::Value,
) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), to_json_value_with(v, render_file)))
            .collect(),
    )
}

/// The default rendering of a file reference.
pub fn file_to_json(file: &FileRef) -> serde_json::Value {
    json!({
        "filename": file.filename,
        "content_type": file.content_type,
        "size": file.size,
        "handle": file.handle.0,
    })
}

/// Compact JSON text for a parse result.
pub fn to_json(map: &Map) -> String {
    map_to_json(map).to_string()
}

/// Pretty-printed JSON text (2-space indentation) for a parse result.
pub fn to_json_pretty(map: &Map) -> String {
    // serializing a serde_json::Value cannot fail
    serde_json::to_string_pretty(&map_to_json(map)).unwrap_or_default()
}
