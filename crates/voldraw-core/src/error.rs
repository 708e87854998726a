//! Error types for voldraw.

use thiserror::Error;

/// The main error type for volume data operations.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// A grid was created with zero channels.
    #[error("grid '{0}' must have at least one channel")]
    InvalidChannelCount(String),

    /// A grid with the given name already exists in the volume.
    #[error("grid '{0}' already exists")]
    GridExists(String),

    /// A grid with the given name was not found.
    #[error("grid '{0}' not found")]
    GridNotFound(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volume data operations.
pub type Result<T> = std::result::Result<T, VolumeError>;
