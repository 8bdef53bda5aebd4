//! Error types for specpick-core.

use thiserror::Error;

/// Result type alias for specpick operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for specpick operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested frame lies outside `[1, frame_count]`.
    #[error("frame {frame_id} not found (dataset has {frame_count} frames)")]
    NotFound { frame_id: u32, frame_count: u32 },

    /// The active frame has no peak candidates.
    #[error("frame {frame_id} has no peak candidates")]
    EmptyCandidateSet { frame_id: u32 },

    /// A frame signal failed validation.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// The dataset contains no frames.
    #[error("dataset contains no frames")]
    EmptyDataset,

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
