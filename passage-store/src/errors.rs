//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for passage-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O or filesystem errors (listing or creating the corpus folder).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Explicitly requested folder is missing or not a directory.
    #[error("{reason}: {}", .path.display())]
    InvalidFolder { path: PathBuf, reason: &'static str },

    /// Question was empty after trimming.
    #[error("question cannot be empty")]
    EmptyQuestion,

    /// Embedding provider failure (unavailable, transport, decode).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Provider returned vectors of inconsistent size or count.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Provider returned a vector containing NaN or infinity.
    #[error("vector {index} has non-finite components")]
    NonFiniteVector { index: usize },
}

impl From<embedding_service::EmbeddingError> for StoreError {
    fn from(err: embedding_service::EmbeddingError) -> Self {
        StoreError::Embedding(err.to_string())
    }
}

/// Per-file extraction failure. Logged by the cache and replaced with empty text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Failed(String),
}
