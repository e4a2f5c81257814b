//! Error types for the student records store.

use thiserror::Error;

/// Main error type for store operations.
///
/// Expected outcomes such as a duplicate identifier or a missing record are
/// not errors; mutations report those as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Invalid storage format: {0}")]
    InvalidFormat(String),

    #[error("Checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch { expected: u32, got: u32 },

    #[error("Storage is locked by another process")]
    Locked,

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised when constructing typed field values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("GPA must be between 0 and 4, got {0}")]
    GpaOutOfRange(f64),

    #[error("GPA is not a number: {0:?}")]
    InvalidGpa(String),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
