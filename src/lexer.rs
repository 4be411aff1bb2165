use crate::error::ParamsError;
use crate::path::{KeyPath, PathSegment};

/// Splits a raw parameter name such as `users[][data][id]` into a [`KeyPath`].
///
/// The leading name runs up to the first `[` and always includes the first
/// character, so `[ross][]` has the leading name `[ross]`. Each following
/// bracket group becomes a segment: `[]` is [`PathSegment::Anonymous`], any
/// other content is a [`PathSegment::Name`]. Characters between bracket
/// groups are skipped. Brackets are structural, so names are not decoded.
pub struct PathLexer {
    input: Vec<char>,
    position: usize,
    max_depth: usize,
}

impl PathLexer {
    pub fn new(input: &str, max_depth: usize) -> Self {
        PathLexer {
            input: input.chars().collect(),
            position: 0,
            max_depth,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn raw(&self) -> String {
        self.input.iter().collect()
    }

    fn read_leading_name(&mut self) -> String {
        let mut result = String::new();
        if let Some(first) = self.current_char() {
            result.push(first);
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if ch == '[' {
                break;
            }
            result.push(ch);
            self.advance();
        }
        result
    }

    /// Read one `[...]` group; the cursor sits on the opening bracket.
    fn read_group(&mut self) -> Result<PathSegment, ParamsError> {
        if self.peek_char(1) == Some(']') {
            self.position += 2;
            return Ok(PathSegment::Anonymous);
        }

        self.advance(); // consume '['
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == ']' {
                return Ok(PathSegment::Name(name));
            }
            name.push(ch);
        }

        Err(ParamsError::BadParams { key: self.raw() })
    }

    fn too_deep(&self) -> ParamsError {
        ParamsError::TooDeep {
            key: self.raw(),
            max_depth: self.max_depth,
        }
    }

    pub fn tokenize(&mut self) -> Result<KeyPath, ParamsError> {
        let leading = self.read_leading_name();
        if leading.is_empty() {
            return Err(ParamsError::BadParams { key: self.raw() });
        }

        if self.max_depth == 0 {
            return Err(self.too_deep());
        }
        let mut segments = vec![PathSegment::Name(leading)];

        while let Some(ch) = self.current_char() {
            if ch != '[' {
                self.advance();
                continue;
            }
            // depth is checked before the group is read, so an over-deep key
            // reports TooDeep even when a later bracket is unterminated
            if segments.len() >= self.max_depth {
                return Err(self.too_deep());
            }
            segments.push(self.read_group()?);
        }

        Ok(KeyPath::new(&self.raw(), segments))
    }
}

/// Tokenize `name` with a segment cap of `max_depth`.
///
/// ```
/// use paramtree::lexer::tokenize_key;
/// use paramtree::path::PathSegment;
///
/// let path = tokenize_key("users[][id]", 6).unwrap();
/// assert_eq!(
///     path.segments(),
///     &[
///         PathSegment::Name("users".into()),
///         PathSegment::Anonymous,
///         PathSegment::Name("id".into()),
///     ]
/// );
/// ```
pub fn tokenize_key(name: &str, max_depth: usize) -> Result<KeyPath, ParamsError> {
    PathLexer::new(name, max_depth).tokenize()
}
