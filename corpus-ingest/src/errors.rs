//! Unified error types for the crate.

use corpus_store::StoreError;
use thiserror::Error;

/// Top-level error for ingestion operations.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Invalid chunking/batching parameters.
    #[error("config error: {0}")]
    Config(String),

    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document could not be read as a supported format.
    #[error("document error: {0}")]
    Document(String),

    /// Embedding or store failure (wrapped; aborts the run).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
