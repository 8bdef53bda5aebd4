//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory mapping error.
    #[error("memory mapping error: {0}")]
    MmapError(String),

    /// Malformed dataset content.
    #[error("invalid dataset at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    /// Required column missing from the header.
    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] specpick_core::Error),
}
