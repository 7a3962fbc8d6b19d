//! Universal health service for LLM backends (Ollama, OpenAI).
//!
//! Lightweight probes per provider:
//! - Ollama: `GET {endpoint}/api/tags`
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] is resilient and never fails;
//! errors are mapped to `ok = false`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::AiLlmError;

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Ollama", "OpenAI").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// A universal health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Checks health for a single LLM config, routing to the provider probe.
    ///
    /// This method is **resilient**: it never returns an error. Any failure
    /// is converted to `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(provider = ?cfg.provider, endpoint = %cfg.endpoint, "invalid endpoint");
            return HealthStatus {
                provider: format!("{:?}", cfg.provider),
                endpoint: endpoint.to_string(),
                model: cfg.model.clone(),
                ok: false,
                latency_ms: 0,
                message: "endpoint is empty or missing http/https".into(),
            };
        }

        let url = match cfg.provider {
            LlmProvider::Ollama => format!("{endpoint}/api/tags"),
            LlmProvider::OpenAI => format!("{endpoint}/v1/models"),
        };

        let start = Instant::now();
        let mut req = self.client.get(&url);
        if let (LlmProvider::OpenAI, Some(key)) = (cfg.provider, cfg.api_key.as_deref()) {
            req = req.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let (ok, message) = match req.send().await {
            Ok(resp) if resp.status().is_success() => (true, "reachable".to_string()),
            Ok(resp) => (false, format!("HTTP {} from {url}", resp.status())),
            Err(e) => (false, format!("request failed: {e}")),
        };
        let latency_ms = start.elapsed().as_millis();

        let status = HealthStatus {
            provider: format!("{:?}", cfg.provider),
            endpoint: endpoint.to_string(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message,
        };

        info!(
            provider = %status.provider,
            model = %status.model,
            ok = status.ok,
            latency_ms = status.latency_ms,
            "health probe completed"
        );

        status
    }

    /// Checks a list of configs sequentially and collects the snapshots.
    pub async fn check_many(&self, cfgs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_endpoint_is_reported_not_raised() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "m".into(),
            endpoint: "not-a-url".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert!(status.message.contains("http"));
    }
}
