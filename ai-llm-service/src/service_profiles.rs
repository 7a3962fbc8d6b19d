//! Shared LLM service with two active profiles: `answer` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Provides convenience methods to generate answers and to compute
//!   embeddings (single or batch).

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};
use crate::{error_handler::AiLlmError, services::ollama_service::OllamaService};

/// Shared service that manages two logical LLM profiles: **answer** and
/// **embedding**.
///
/// Internally caches Ollama/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    answer: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with the two profiles.
    ///
    /// - `answer`: generation profile producing final answers.
    /// - `embedding`: embedding profile for chunks and questions.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        answer: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            answer,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds both profiles strictly from environment variables.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] if a required variable is missing —
    /// callers are expected to fail fast at startup rather than default.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let answer = crate::config::default_config::config_answer()?;
        let embedding = crate::config::default_config::config_embedding()?;
        Self::new(answer, embedding, Some(10))
    }

    /// Generates text using the **answer** profile.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `system`: optional system instruction (applies to chat-style
    ///   providers; ignored by Ollama `/api/generate`).
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match self.answer.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.answer).await?;
                cli.generate(prompt).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.answer).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Computes a single embedding using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let mut out = self.embed_batch(&[input.to_string()]).await?;
        Ok(out.pop().unwrap_or_default())
    }

    /// Computes embeddings for a batch of inputs, one vector per input
    /// string, order-preserving.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails or the response
    /// shape does not match the input count.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embed_batch(inputs).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embed_batch(inputs).await
            }
        }
    }

    /// Returns a health snapshot for the distinct profiles.
    ///
    /// If the embedding profile equals the answer profile, it is checked
    /// only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(2);
        list.push(self.answer.clone());
        if self.embedding != self.answer {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(answer, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.answer, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn client_key_distinguishes_models() {
        let a = ClientKey::from(&cfg("a"));
        let b = ClientKey::from(&cfg("b"));
        assert!(a != b);
        assert!(a == ClientKey::from(&cfg("a")));
    }

    #[tokio::test]
    async fn empty_batch_short_circuits() {
        let svc = LlmServiceProfiles::new(cfg("gen"), cfg("emb"), Some(1)).unwrap();
        let out = svc.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
