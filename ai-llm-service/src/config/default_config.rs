//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by provider and
//! role. Two roles exist here:
//!
//! - **Answer**    → generative model that produces the final answer
//! - **Embedding** → embedding generator for chunks and questions
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (`ollama` or `openai`), defaults to `ollama`
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = answer model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_URL`             = endpoint base, defaults to `https://api.openai.com`
//! - `OPENAI_API_KEY`         = bearer token (mandatory)
//! - `OPENAI_MODEL`           = answer model (mandatory)
//! - `EMBEDDING_MODEL`        = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt_u32, must_env},
};

/// Resolves the configured provider kind from `LLM_KIND` (default Ollama).
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown kind string.
pub fn provider_kind() -> Result<LlmProvider, AiLlmError> {
    match std::env::var("LLM_KIND") {
        Ok(v) if !v.trim().is_empty() => {
            LlmProvider::parse(&v).ok_or_else(|| ConfigError::UnsupportedProvider(v).into())
        }
        _ => Ok(LlmProvider::Ollama),
    }
}

/// Constructs the **answer** profile config for the configured provider.
///
/// # Errors
/// Propagates missing-variable and format errors from the provider-specific
/// constructors.
pub fn config_answer() -> Result<LlmModelConfig, AiLlmError> {
    match provider_kind()? {
        LlmProvider::Ollama => config_ollama_answer(),
        LlmProvider::OpenAI => config_openai_answer(),
    }
}

/// Constructs the **embedding** profile config for the configured provider.
///
/// # Errors
/// Propagates missing-variable and format errors from the provider-specific
/// constructors.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    match provider_kind()? {
        LlmProvider::Ollama => config_ollama_embedding(),
        LlmProvider::OpenAI => config_openai_embedding(),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs a config for the **answer** Ollama model.
///
/// # Env
/// - `OLLAMA_MODEL` (required)
/// - `LLM_MAX_TOKENS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(120)`
pub fn config_ollama_answer() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs a config for the **embedding** Ollama model.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Constructs a config for the **answer** model on an OpenAI-compatible API.
pub fn config_openai_answer() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs a config for the **embedding** model on an OpenAI-compatible API.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_known_values() {
        assert_eq!(LlmProvider::parse("ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::parse("OpenAI"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("vertex"), None);
    }
}
