//! Error types for the username probe.

use std::io;
use thiserror::Error;

/// Result type alias for probe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for probe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the database driver, message kept verbatim.
    #[error("{message}")]
    Driver { message: String },

    /// Oracle database error.
    #[error("ORA-{code:05}: {message}")]
    Oracle { code: u32, message: String },

    /// I/O error while writing probe output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid connect string.
    #[error("Invalid connect string: {message}")]
    InvalidConnectString { message: String },

    /// Identifier cannot be spliced into DDL.
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Null value error.
    #[error("Unexpected NULL value in column {column}")]
    NullValue { column: usize },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// Query returned something other than what the caller expected.
    #[error("Unexpected result: {message}")]
    UnexpectedResult { message: String },

    /// Session used after it was closed.
    #[error("Connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Create a driver error.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an Oracle database error.
    pub fn oracle(code: u32, message: impl Into<String>) -> Self {
        Self::Oracle {
            code,
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create an unexpected result error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResult {
            message: message.into(),
        }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(identifier: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<oracle_rs::Error> for Error {
    fn from(err: oracle_rs::Error) -> Self {
        match err {
            oracle_rs::Error::OracleError { code, message } => Self::Oracle {
                code: code as u32,
                message,
            },
            oracle_rs::Error::ConnectionClosed => Self::ConnectionClosed,
            other => Self::driver(other.to_string()),
        }
    }
}
