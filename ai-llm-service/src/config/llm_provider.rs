/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// Distinguishes between a local Ollama runtime and any OpenAI-compatible
/// HTTP API. Adding more providers later (e.g., a managed cloud endpoint)
/// means extending this enum and the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI-compatible REST API (chat completions + embeddings).
    OpenAI,
}

impl LlmProvider {
    /// Parses a provider name as found in `LLM_KIND` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "open_ai" | "open-ai" => Some(Self::OpenAI),
            _ => None,
        }
    }
}
