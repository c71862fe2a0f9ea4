//! Crate-level error types

use thiserror::Error;

/// Crate-level result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while composing configuration or building components
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Dispatch string matched no registered variant
    #[error("Unknown {category} '{name}'. Valid options: {valid:?}")]
    UnknownName {
        category: &'static str,
        name: String,
        valid: Vec<&'static str>,
    },

    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File contents did not match the expected format
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl Error {
    /// Attach a file path to an I/O error.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Attach a file path and reason to a parse failure.
    pub fn parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse { path: path.into(), reason: reason.into() }
    }
}
