//! Core data models used by the library.

use serde::{Deserialize, Serialize};

/// Canonical record stored in the collection: one chunk of the source text,
/// its embedding vector, and the metadata required for auditable retrieval.
///
/// The `id` is deterministic (`chunk_<index>`), so re-ingesting the same
/// document overwrites prior records instead of duplicating them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorpusRecord {
    /// Deterministic record id, `chunk_<index>`.
    pub id: String,
    /// Chunk text as produced by the splitter.
    pub text: String,
    /// Source document label (e.g., the book title).
    pub source: String,
    /// Zero-based position of the chunk in the split sequence.
    pub index: usize,
    /// Embedding vector; length must equal the collection dimensionality.
    pub embedding: Vec<f32>,
}

/// A single retrieval hit: similarity score plus the persisted payload.
///
/// Hits are returned in non-increasing score order (descending cosine
/// similarity, i.e. ascending distance).
#[derive(Clone, Debug)]
pub struct ScoredChunk {
    /// Similarity score reported by the store.
    pub score: f32,
    /// Chunk text.
    pub text: String,
    /// Source document label.
    pub source: String,
    /// Chunk position within the source.
    pub index: usize,
}
