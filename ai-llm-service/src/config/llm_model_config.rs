use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// Contains both general and provider-specific parameters; one instance
/// describes one profile (answer or embedding).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (e.g., Ollama, OpenAI).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"llama3.1"`, `"nomic-embed-text"`).
    pub model: String,

    /// Inference endpoint (local socket/URL or remote API URL).
    pub endpoint: String,

    /// Optional API key for authentication (OpenAI-compatible APIs).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
