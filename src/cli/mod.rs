//! CLI support for paramtree
//!
//! Provides programmatic access to the `paramtree` commands so the same
//! behavior can be embedded in other tools or tested without a subprocess.

mod multipart;
mod query;

pub use multipart::{MultipartOptions, execute_multipart};
pub use query::{QueryOptions, execute_query};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// The input was rejected by the parser
    Params(crate::ParamsError),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl CliError {
    /// Process exit status: 1 for rejected input, 2 for environment failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Params(e) if e.is_client_error() => 1,
            CliError::NoInput => 1,
            _ => 2,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Params(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Pass it as an argument or pipe it to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Params(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<crate::ParamsError> for CliError {
    fn from(e: crate::ParamsError) -> Self {
        CliError::Params(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
