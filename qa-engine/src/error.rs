//! Typed error for the qa-engine crate.

use thiserror::Error;

/// Pipeline stage that was executing when an upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    /// Embedding the question.
    Embed,
    /// Nearest-neighbor retrieval from the corpus store.
    Retrieve,
    /// Answer generation from the assembled prompt.
    Generate,
}

impl std::fmt::Display for QueryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryStage::Embed => write!(f, "embed"),
            QueryStage::Retrieve => write!(f, "retrieve"),
            QueryStage::Generate => write!(f, "generate"),
        }
    }
}

/// Errors and terminal outcomes of the query pipeline.
///
/// `NoContext` is a legitimate terminal outcome, not an internal failure —
/// callers surface it as a "not found" response. `Upstream` names the stage
/// that failed so callers can log precisely; the pipeline performs no
/// retries and returns no partial results.
#[derive(Debug, Error)]
pub enum QaError {
    /// The question was empty after trimming; rejected before any external
    /// call.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Retrieval returned zero records for the question vector.
    #[error("no relevant context found in the corpus")]
    NoContext,

    /// An embedding, store, or generation call failed.
    #[error("{stage} stage failed: {source}")]
    Upstream {
        /// Stage that was executing.
        stage: QueryStage,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl QaError {
    /// Wraps an upstream failure with the stage it occurred in.
    pub fn upstream(
        stage: QueryStage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Upstream {
            stage,
            source: source.into(),
        }
    }
}
