//! Offline ingestion for the book corpus.
//!
//! Pipeline: extract plain text from the source document → split into
//! overlapping chunks → embed each batch → persist records in the corpus
//! store under deterministic ids. Re-running the pipeline on the same input
//! overwrites rather than duplicates.

pub mod chunker;
pub mod errors;
pub mod extract;
pub mod pipeline;

pub use chunker::{ChunkParams, split_text};
pub use errors::IngestError;
pub use extract::{extract_document, extract_epub, normalize_text};
pub use pipeline::{ChunkSink, IngestParams, ingest_document, ingest_text};
