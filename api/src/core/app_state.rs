//! Shared state for all HTTP handlers.
//!
//! Everything the handlers need is constructed once at process start and
//! injected here — external service clients are never reached through
//! ambient globals, so tests can wire fakes through the same seams.

use std::sync::Arc;

use ai_llm_service::{error_handler::AiLlmError, service_profiles::LlmServiceProfiles};
use corpus_store::{CorpusStore, ProfilesEmbedder, StoreConfig, StoreError};
use qa_engine::{ProfilesAnswerer, QaEngine, QaOptions};
use thiserror::Error;
use tracing::info;

/// Startup configuration failure: a required identifier or credential is
/// absent or malformed. Fails fast — nothing defaults silently.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Query pipeline, wired once with its production collaborators.
    pub engine: Arc<QaEngine>,
    /// LLM service handle, kept for health probes.
    pub svc: Arc<LlmServiceProfiles>,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the LLM profiles or the store config are
    /// incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        let svc = Arc::new(LlmServiceProfiles::from_env()?);

        let store_cfg = StoreConfig::from_env()?;
        let embedding_dim = store_cfg.embedding_dim;
        info!(
            collection = %store_cfg.collection,
            embedding_dim,
            "connecting corpus store"
        );
        let store = Arc::new(CorpusStore::new(store_cfg)?);

        let embedder = Arc::new(ProfilesEmbedder::new(svc.clone(), embedding_dim));
        let generator = Arc::new(ProfilesAnswerer::new(svc.clone()));
        let engine = Arc::new(QaEngine::new(
            embedder,
            store,
            generator,
            QaOptions::from_env(),
        ));

        Ok(Self { engine, svc })
    }
}
