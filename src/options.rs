/// Default cap on key path segments, counting the leading name.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Default read size when pulling multipart input from a reader (16 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Default cap on the header block of a single multipart part (16 KiB).
pub const DEFAULT_MAX_HEADER_BYTES: usize = 16 * 1024;

/// Per-call parser configuration.
///
/// ```
/// use paramtree::{ParseOptions, parse_query};
///
/// let options = ParseOptions::default().with_max_depth(2);
/// assert!(parse_query("a[b]=1", &options).is_ok());
/// assert!(parse_query("a[b][c]=1", &options).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of segments in a key path. `a` has one segment,
    /// `a[b][]` has three.
    ///
    /// Default: 6
    pub max_depth: usize,

    /// Number of bytes requested per read when a multipart body is pulled
    /// from a `std::io::Read`.
    ///
    /// Default: 16,384
    pub chunk_size: usize,

    /// Largest header block accepted for one multipart part.
    ///
    /// Default: 16,384
    pub max_header_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        // a zero-sized read would never make progress
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }
}
