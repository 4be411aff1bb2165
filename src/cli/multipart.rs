//! Parse multipart/form-data bodies from the command line

use std::io::Read;
use std::path::PathBuf;

use serde_json::json;

use super::CliError;
use crate::output::{file_to_json, map_to_json_with};
use crate::{MemorySinks, ParseOptions, TempFileSinks, parse_multipart};

/// Options for the multipart command
#[derive(Debug, Clone, Default)]
pub struct MultipartOptions {
    /// Boundary token, as found in the request's Content-Type
    pub boundary: String,
    /// Keep uploaded files in this directory instead of in memory
    pub upload_dir: Option<PathBuf>,
    pub parse: ParseOptions,
}

/// Parse a multipart body read from `input` and return the tree as JSON.
///
/// With an upload directory, each file entry gains a `path` field pointing at
/// the stored upload.
pub fn execute_multipart<R: Read>(
    input: R,
    options: &MultipartOptions,
) -> Result<serde_json::Value, CliError> {
    match &options.upload_dir {
        Some(dir) => {
            let mut sinks = TempFileSinks::new(dir.clone());
            let params = parse_multipart(input, &options.boundary, &options.parse, &mut sinks)?;
            Ok(map_to_json_with(&params, &|file| {
                let mut rendered = file_to_json(file);
                if let Some(path) = sinks.path(file.handle) {
                    rendered["path"] = json!(path.display().to_string());
                }
                rendered
            }))
        }
        None => {
            let mut sinks = MemorySinks::new();
            let params = parse_multipart(input, &options.boundary, &options.parse, &mut sinks)?;
            Ok(map_to_json_with(&params, &file_to_json))
        }
    }
}
