//! Error types for the form store.

use crate::types::Handle;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The engine named a handle this store never issued.
    #[error("Store: handle {handle} out of bounds (store holds {len} slots)")]
    OutOfBounds { handle: Handle, len: usize },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid initial data: {0}")]
    InvalidInitialData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
