//! Storage layer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Corrupted file {path:?}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Payload of {len} bytes exceeds the frame limit of {max} bytes")]
    PayloadTooLarge { len: usize, max: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
