//! Rebuilds nested request parameters from flat key/value pairs.
//!
//! Query strings (`users[][name]=ross&users[][name]=joey`) and
//! `multipart/form-data` bodies carry repeated, bracketed names. This crate
//! turns them into a tree of maps, lists and scalars, rejecting malformed
//! names, over-deep paths and conflicting shapes with a typed
//! [`ParamsError`].
//!
//! ```
//! use paramtree::{ParseOptions, parse_query, to_json};
//!
//! let params = parse_query("ross[friends][]=chandler&ross[friends][]=joey", &ParseOptions::default()).unwrap();
//! assert_eq!(to_json(&params), r#"{"ross":{"friends":["chandler","joey"]}}"#);
//! ```

pub mod decode;
pub mod error;
pub mod lexer;
pub mod multipart;
pub mod options;
pub mod output;
pub mod path;
pub mod query;
pub mod tree;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{ErrorKind, ParamsError};
pub use lexer::{PathLexer, tokenize_key};
pub use multipart::{
    MemorySinks, MultipartParser, SinkFactory, TempFileSinks, boundary_from_content_type,
    parse_multipart, parse_multipart_chunks,
};
pub use options::ParseOptions;
pub use output::{to_json, to_json_pretty};
pub use path::{KeyPath, PathSegment};
pub use query::{parse_query, parse_urlencoded_query};
pub use value::{FileHandle, FileRef, Map, Value};
