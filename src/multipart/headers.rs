use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParamsError;

/// RFC 2046 caps boundaries at 70 characters.
const MAX_BOUNDARY_LEN: usize = 70;

/// `; key=value` or `; key="quoted \" value"` after a header's main token.
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#";\s*([^\s=;]+)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^;]*))"#)
        .expect("parameter pattern is valid")
});

/// Headers of one multipart part that the parser acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHeaders {
    /// Field name from `Content-Disposition`, not yet tokenized
    pub name: String,
    /// Present for file parts, even when empty
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl PartHeaders {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Parse the header block of a part (everything before the blank line).
pub fn parse_part_headers(block: &[u8]) -> Result<PartHeaders, ParamsError> {
    let text = String::from_utf8_lossy(block);

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        // obsolete line folding: a leading space continues the previous header
        if line.starts_with([' ', '\t']) {
            match lines.last_mut() {
                Some(previous) => {
                    previous.push(' ');
                    previous.push_str(line.trim_start());
                    continue;
                }
                None => return Err(ParamsError::malformed("part headers start with a continuation line")),
            }
        }
        lines.push(line.to_string());
    }

    let mut disposition = None;
    let mut content_type = None;
    for line in &lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(ParamsError::malformed(format!("invalid part header line {:?}", line)));
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-disposition") {
            disposition = Some(value.trim().to_string());
        } else if name.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_string());
        }
    }

    let disposition =
        disposition.ok_or_else(|| ParamsError::malformed("part without Content-Disposition"))?;
    let (kind, params) = split_header_value(&disposition);
    if !kind.eq_ignore_ascii_case("form-data") {
        return Err(ParamsError::malformed(format!(
            "unsupported Content-Disposition {:?}",
            kind
        )));
    }

    let mut name = None;
    let mut filename = None;
    for (key, value) in params {
        if key.eq_ignore_ascii_case("name") {
            name = Some(value);
        } else if key.eq_ignore_ascii_case("filename") {
            filename = Some(value);
        }
    }

    let name = name.ok_or_else(|| ParamsError::malformed("Content-Disposition without a name"))?;

    Ok(PartHeaders {
        name,
        filename,
        content_type: content_type.filter(|ct| !ct.is_empty()),
    })
}

/// Pull the boundary out of a `multipart/form-data` Content-Type header.
///
/// ```
/// use paramtree::multipart::boundary_from_content_type;
///
/// let boundary = boundary_from_content_type("multipart/form-data; boundary=\"abc 123\"").unwrap();
/// assert_eq!(boundary, "abc 123");
/// assert!(boundary_from_content_type("application/json").is_err());
/// ```
pub fn boundary_from_content_type(content_type: &str) -> Result<String, ParamsError> {
    let (mime, params) = split_header_value(content_type);
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return Err(ParamsError::malformed(format!(
            "incorrect content type for multipart request: {:?}",
            mime
        )));
    }

    let boundary = params
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value)
        .ok_or_else(|| ParamsError::malformed("Content-Type has no boundary"))?;
    validate_boundary(&boundary)?;
    Ok(boundary)
}

pub(crate) fn validate_boundary(boundary: &str) -> Result<(), ParamsError> {
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
        return Err(ParamsError::malformed(format!(
            "invalid boundary length {}",
            boundary.len()
        )));
    }
    if boundary.contains(['\r', '\n']) {
        return Err(ParamsError::malformed("boundary contains a line break"));
    }
    Ok(())
}

/// Split `token; a=1; b="two"` into the token and its parameters.
fn split_header_value(value: &str) -> (&str, Vec<(String, String)>) {
    let (main, rest) = match value.find(';') {
        Some(at) => value.split_at(at),
        None => (value, ""),
    };

    let params = PARAMETER
        .captures_iter(rest)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = match (caps.get(2), caps.get(3)) {
                (Some(quoted), _) => unescape_quoted(quoted.as_str()),
                (None, Some(bare)) => bare.as_str().trim().to_string(),
                (None, None) => String::new(),
            };
            Some((key, value))
        })
        .collect();

    (main.trim(), params)
}

fn unescape_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(ch);
        }
    }
    result
}
