//! Runtime and collection configuration.

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for corpus ingestion and retrieval.
///
/// The embedding dimensionality is part of the store configuration because
/// it must match across ingestion and query time for the lifetime of a
/// collection; a mismatch makes similarity search meaningless.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Fixed embedding dimensionality for the collection.
    pub embedding_dim: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl StoreConfig {
    /// Creates a sane default config for a given collection name and Qdrant
    /// endpoint.
    pub fn new_default(
        url: impl Into<String>,
        collection: impl Into<String>,
        embedding_dim: usize,
    ) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            embedding_dim,
            exact_search: false,
        }
    }

    /// Builds the config from environment variables.
    ///
    /// - `QDRANT_URL` (default `http://127.0.0.1:6334`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default `book_chunks`)
    /// - `EMBEDDING_DIM` (default 768)
    /// - `QDRANT_EXACT_SEARCH` (`true`/`false`, default false)
    ///
    /// # Errors
    /// Returns `StoreError::Config` if `EMBEDDING_DIM` is set but not a
    /// positive integer.
    pub fn from_env() -> Result<Self, StoreError> {
        let embedding_dim = match std::env::var("EMBEDDING_DIM") {
            Ok(v) if !v.trim().is_empty() => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| {
                    StoreError::Config("EMBEDDING_DIM must be a positive integer".into())
                })?,
            _ => 768,
        };

        let cfg = Self {
            qdrant_url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:6334".into()),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok().filter(|s| !s.is_empty()),
            collection: std::env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "book_chunks".into()),
            distance: DistanceKind::Cosine,
            embedding_dim,
            exact_search: std::env::var("QDRANT_EXACT_SEARCH")
                .map(|v| v == "true")
                .unwrap_or(false),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }

    /// The vector space implied by this configuration.
    pub fn vector_space(&self) -> VectorSpace {
        VectorSpace {
            size: self.embedding_dim,
            distance: self.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_collection() {
        let mut cfg = StoreConfig::new_default("http://localhost:6334", "c", 8);
        cfg.collection = "".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_dim() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "c", 0);
        assert!(cfg.validate().is_err());
    }
}
