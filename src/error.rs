use std::io;

/// Coarse classification of a [`ParamsError`].
///
/// The first four kinds are request errors: the input itself is unacceptable
/// and the caller should reject it. `Io` means a collaborator (the byte source
/// or a file sink) failed underneath the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadParams,
    TooDeep,
    TypeConflict,
    MalformedMultipart,
    Io,
}

/// Errors that abort a parse.
///
/// Every error is fatal for the call that raised it: the partially built
/// tree is dropped and no result is returned.
#[derive(Debug)]
pub enum ParamsError {
    /// A key path has an unterminated bracket (`names[`), or is empty
    BadParams { key: String },

    /// A key path has more segments than `ParseOptions::max_depth` allows
    TooDeep { key: String, max_depth: usize },

    /// A key path needs a container of one kind where another already exists
    TypeConflict {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The multipart byte stream itself is corrupt (boundary or part headers)
    MalformedMultipart { detail: String },

    /// Reading the input or writing a file sink failed
    Io(io::Error),
}

impl ParamsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParamsError::BadParams { .. } => ErrorKind::BadParams,
            ParamsError::TooDeep { .. } => ErrorKind::TooDeep,
            ParamsError::TypeConflict { .. } => ErrorKind::TypeConflict,
            ParamsError::MalformedMultipart { .. } => ErrorKind::MalformedMultipart,
            ParamsError::Io(_) => ErrorKind::Io,
        }
    }

    /// True when the request should be rejected as a client error rather than
    /// reported as a server fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ParamsError::Io(_))
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        ParamsError::MalformedMultipart {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsError::BadParams { key } => write!(f, "Bad params: {:?}", key),
            ParamsError::TooDeep { key, max_depth } => write!(
                f,
                "Params too deep: {:?} exceeds {} segments",
                key, max_depth
            ),
            ParamsError::TypeConflict {
                key,
                expected,
                found,
            } => write!(
                f,
                "Type conflict in {:?}: expected {}, found {}",
                key, expected, found
            ),
            ParamsError::MalformedMultipart { detail } => {
                write!(f, "Malformed multipart request: {}", detail)
            }
            ParamsError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParamsError {
    fn from(e: io::Error) -> Self {
        ParamsError::Io(e)
    }
}
