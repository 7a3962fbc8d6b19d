//! Consumer-side seams for the engine's two remaining external calls.
//!
//! The engine already takes embeddings through
//! `corpus_store::EmbeddingsProvider`; these traits cover retrieval and
//! generation so every external capability can be replaced by a fake in
//! tests.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::service_profiles::LlmServiceProfiles;
use corpus_store::{CorpusStore, ScoredChunk, StoreError};
use tracing::trace;

/// Read side of the corpus store, as seen by the query pipeline.
pub trait ContextSource: Send + Sync {
    /// Returns the top-`limit` records nearest to `vector`, ranked by
    /// descending similarity.
    fn nearest(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredChunk>, StoreError>> + Send + '_>>;
}

impl ContextSource for CorpusStore {
    fn nearest(
        &self,
        vector: Vec<f32>,
        limit: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredChunk>, StoreError>> + Send + '_>> {
        Box::pin(CorpusStore::nearest(self, vector, limit))
    }
}

/// Generation capability consumed by the query pipeline.
pub trait AnswerProvider: Send + Sync {
    /// Generates an answer for the assembled prompt.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, Box<dyn std::error::Error + Send + Sync>>> + Send + 'a>>;
}

/// Production answer provider backed by the shared LLM service profiles.
#[derive(Clone)]
pub struct ProfilesAnswerer {
    svc: Arc<LlmServiceProfiles>,
}

impl ProfilesAnswerer {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl AnswerProvider for ProfilesAnswerer {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, Box<dyn std::error::Error + Send + Sync>>> + Send + 'a>>
    {
        Box::pin(async move {
            trace!("ProfilesAnswerer::generate prompt_len={}", prompt.len());
            let answer = self.svc.generate(prompt, None).await?;
            Ok(answer)
        })
    }
}
