//! Vector store facade for the book corpus: upsert + retrieval over Qdrant.
//!
//! This crate provides a clean API to:
//! - Persist chunk records (text + embedding + metadata) with stable ids
//! - Retrieve top-K nearest records for a query vector (cosine)
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules.

mod config;
pub mod embed;
mod errors;
mod ids;
mod qdrant_facade;
mod record;

pub use config::{DistanceKind, StoreConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, ProfilesEmbedder};
pub use errors::StoreError;
pub use ids::stable_uuid;
pub use record::{CorpusRecord, ScoredChunk};

use tracing::{debug, trace};

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct CorpusStore {
    cfg: StoreConfig,
    client: qdrant_facade::QdrantFacade,
}

impl CorpusStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the client initialization fails.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        trace!("CorpusStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Ensures the backing collection exists with the configured vector
    /// space. Call once before the first upsert.
    ///
    /// # Errors
    /// Returns `StoreError::Qdrant` on client failures.
    pub async fn ensure_ready(&self) -> Result<(), StoreError> {
        self.client.ensure_collection(&self.cfg.vector_space()).await
    }

    /// Upserts a batch of corpus records.
    ///
    /// Record ids are deterministic, so re-ingesting the same content
    /// overwrites prior points instead of duplicating them. Every record's
    /// vector is validated against the configured dimensionality first.
    ///
    /// # Errors
    /// Returns `StoreError::VectorSizeMismatch` on a bad vector, or
    /// `StoreError::Qdrant` if the upsert fails.
    pub async fn upsert(&self, records: &[CorpusRecord]) -> Result<u64, StoreError> {
        for r in records {
            if r.embedding.len() != self.cfg.embedding_dim {
                return Err(StoreError::VectorSizeMismatch {
                    got: r.embedding.len(),
                    want: self.cfg.embedding_dim,
                });
            }
        }
        let points = records.iter().map(qdrant_facade::build_point).collect();
        self.client.upsert_points(points).await
    }

    /// Returns the top-`limit` records nearest to `vector` under the
    /// configured distance, in non-increasing similarity order.
    ///
    /// # Errors
    /// Returns `StoreError::VectorSizeMismatch` if the query vector has the
    /// wrong dimensionality, or `StoreError::Qdrant` if the search fails.
    pub async fn nearest(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredChunk>, StoreError> {
        if vector.len() != self.cfg.embedding_dim {
            return Err(StoreError::VectorSizeMismatch {
                got: vector.len(),
                want: self.cfg.embedding_dim,
            });
        }

        debug!("CorpusStore::nearest limit={limit}");
        let hits = self
            .client
            .search(vector, limit, /* with_payload */ true, self.cfg.exact_search)
            .await?;

        let mut out = Vec::with_capacity(hits.len());
        for (score, payload) in hits {
            let text = payload
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let source = payload
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let index = payload
                .get("index")
                .and_then(|v| v.as_u64())
                .unwrap_or_default() as usize;
            out.push(ScoredChunk {
                score,
                text,
                source,
                index,
            });
        }

        trace!("CorpusStore::nearest hits={}", out.len());
        Ok(out)
    }
}
