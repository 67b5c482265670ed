//! Error types for the backing document store.

use thiserror::Error;

use super::Collection;

/// Errors raised by a [`DocumentStore`](super::DocumentStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Partial update against a record that does not exist.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    /// File-backed store could not read or write its data.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote backend rejected or failed the call.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
