//! Public API types re-used by external crates (e.g., the HTTP API layer).

/// Options that control retrieval for a single question.
#[derive(Clone, Copy, Debug)]
pub struct QaOptions {
    /// Number of nearest chunks fetched from the vector store and fed to
    /// the prompt.
    pub top_k: u64,
}

impl Default for QaOptions {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl QaOptions {
    /// Builds options from `RAG_TOP_K` in the environment, defaulting to 5.
    pub fn from_env() -> Self {
        let top_k = std::env::var("RAG_TOP_K")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|k| *k > 0)
            .unwrap_or(5);
        Self { top_k }
    }
}

/// Final answer together with the exact context passed to the model.
///
/// `context` holds the retrieved chunk texts in rank order — exactly the
/// texts that were rendered into the prompt, never a superset or a
/// reordering, so callers can audit grounding.
#[derive(Clone, Debug)]
pub struct QaAnswer {
    /// Model answer (plain text).
    pub answer: String,
    /// Chunk texts used to produce the answer, in retrieval rank order.
    pub context: Vec<String>,
}
