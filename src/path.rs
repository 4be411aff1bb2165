use std::fmt;

/// One step of a parameter key path.
///
/// Key paths are produced by [`PathLexer`](crate::lexer::PathLexer) from raw
/// parameter names and consumed by [`tree::insert`](crate::tree::insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named step: the leading name, or the contents of a non-empty bracket
    ///
    /// # Examples
    /// - `users` → `Name("users")`
    /// - `users[name]` → `[Name("users"), Name("name")]`
    Name(String),

    /// An empty `[]` marker: append to (or continue the last row of) a list
    ///
    /// # Examples
    /// - `names[]` → `[Name("names"), Anonymous]`
    /// - `users[][id]` → `[Name("users"), Anonymous, Name("id")]`
    Anonymous,
}

impl PathSegment {
    pub fn name(&self) -> Option<&str> {
        match self {
            PathSegment::Name(name) => Some(name),
            PathSegment::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, PathSegment::Anonymous)
    }
}

/// A tokenized parameter name.
///
/// Always holds at least one segment, and the first one is always a
/// [`PathSegment::Name`]. The raw name is kept for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl KeyPath {
    pub(crate) fn new(raw: &str, segments: Vec<PathSegment>) -> Self {
        debug_assert!(matches!(segments.first(), Some(PathSegment::Name(_))));
        KeyPath {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The parameter name as it appeared in the input.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The leading name (`users` in `users[][id]`).
    pub fn root(&self) -> &str {
        match self.segments.first() {
            Some(PathSegment::Name(name)) => name,
            _ => "",
        }
    }

    /// Number of segments, counting the leading name.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True for a plain key with no bracket groups.
    pub fn is_plain(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
