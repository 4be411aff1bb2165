//! Parse query strings from the command line

use super::CliError;
use crate::output::map_to_json;
use crate::{ParseOptions, parse_query, parse_urlencoded_query};

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// The query string, without a leading `?`
    pub query: Option<String>,
    /// Decode the whole input once before parsing
    pub urlencoded: bool,
    pub parse: ParseOptions,
}

/// Parse a query string and return the tree as JSON
pub fn execute_query(options: &QueryOptions) -> Result<serde_json::Value, CliError> {
    let query = options.query.as_deref().ok_or(CliError::NoInput)?;
    let query = query.trim_end_matches(['\r', '\n']);
    let query = query.strip_prefix('?').unwrap_or(query);

    let params = if options.urlencoded {
        parse_urlencoded_query(query, &options.parse)?
    } else {
        parse_query(query, &options.parse)?
    };
    Ok(map_to_json(&params))
}
