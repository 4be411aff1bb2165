//! Nested query-string parsing.
//!
//! ```
//! use paramtree::{ParseOptions, parse_query, to_json};
//!
//! let params = parse_query(
//!     "users[][id]=1&users[][name]=ross&users[][id]=2&users[][name]=joey",
//!     &ParseOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     to_json(&params),
//!     r#"{"users":[{"id":"1","name":"ross"},{"id":"2","name":"joey"}]}"#
//! );
//! ```

use crate::decode::{decode_form, decode_form_str};
use crate::error::ParamsError;
use crate::lexer::tokenize_key;
use crate::options::ParseOptions;
use crate::tree;
use crate::value::{Map, Value};

/// Parse a query string such as `a=1&b[]=2&c[d]=3` into a parameter tree.
///
/// Pairs are split on `&` (empty pairs are skipped) and then on the first `=`.
/// Values are form-decoded; names are not. A plain name without `=` maps to
/// [`Value::Null`]; a bracketed name without `=` gets an empty string.
pub fn parse_query(query: &str, options: &ParseOptions) -> Result<Map, ParamsError> {
    let mut params = Map::new();
    let mut pairs = 0usize;

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (name, raw_value) = match pair.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (pair, None),
        };
        if name.is_empty() {
            log::trace!("skipping pair without a name: {:?}", pair);
            continue;
        }

        let path = tokenize_key(name, options.max_depth)?;
        let value = match raw_value {
            Some(raw) => Value::Scalar(decode_form(raw.as_bytes())),
            None if path.is_plain() => Value::Null,
            None => Value::Scalar(String::new()),
        };

        log::trace!("inserting {:?} at {}", value, path);
        tree::insert(&mut params, &path, value)?;
        pairs += 1;
    }

    log::debug!("parsed {} query pairs into {} top-level keys", pairs, params.len());
    Ok(params)
}

/// Parse a query string that was form-encoded once more as a whole, as in
/// `name%3Dross%26occupation%3Dpaleontologist`.
///
/// The input is decoded once and then parsed like [`parse_query`], which
/// applies the usual per-value decoding on top. Unencoded input parses the
/// same as with [`parse_query`] as long as its values need no decoding.
pub fn parse_urlencoded_query(query: &str, options: &ParseOptions) -> Result<Map, ParamsError> {
    let decoded = decode_form_str(query);
    parse_query(&decoded, options)
}
