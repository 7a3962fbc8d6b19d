//! Embedding provider seam.
//!
//! Async is required because real providers (Ollama, OpenAI, etc.) perform
//! HTTP requests. The trait is object-safe so pipelines can hold
//! `Arc<dyn EmbeddingsProvider>` and tests can substitute fakes.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::service_profiles::LlmServiceProfiles;
use tracing::trace;

use crate::errors::StoreError;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in your own embedding backend. Both methods
/// are order-preserving and must return vectors of the collection's fixed
/// dimensionality.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds a single text (used for questions at query time).
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>>;

    /// Embeds a batch of texts in one upstream call (used during ingestion).
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>>;
}

/// Embedding provider backed by the shared LLM service profiles.
///
/// Checks every returned vector against the expected dimensionality, since a
/// silent mismatch would poison the collection.
#[derive(Clone)]
pub struct ProfilesEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl ProfilesEmbedder {
    /// Construct a new embedder over the shared service.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }

    fn check_dim(&self, v: &[f32]) -> Result<(), StoreError> {
        if v.len() != self.dim {
            return Err(StoreError::VectorSizeMismatch {
                got: v.len(),
                want: self.dim,
            });
        }
        Ok(())
    }
}

impl EmbeddingsProvider for ProfilesEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            trace!("ProfilesEmbedder::embed len={}", text.len());
            let v = self
                .svc
                .embed(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;
            self.check_dim(&v)?;
            Ok(v)
        })
    }

    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            trace!("ProfilesEmbedder::embed_batch n={}", texts.len());
            let vecs = self
                .svc
                .embed_batch(texts)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;
            for v in &vecs {
                self.check_dim(v)?;
            }
            Ok(vecs)
        })
    }
}
