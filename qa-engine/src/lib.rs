//! Retrieval-grounded question answering over the book corpus.
//!
//! The pipeline moves through validate → embed → retrieve → ground →
//! answer, with two early exits: an empty question is rejected before any
//! external call, and zero retrieved records terminates in a first-class
//! "no relevant context" outcome (never a generation call against an empty
//! context). Each request is stateless; any number may run concurrently
//! over shared `Arc` handles.

mod api_types;
mod error;
pub mod prompt;
mod seams;

pub use api_types::{QaAnswer, QaOptions};
pub use error::{QaError, QueryStage};
pub use seams::{AnswerProvider, ContextSource, ProfilesAnswerer};

use std::sync::Arc;

use corpus_store::EmbeddingsProvider;
use tracing::{debug, info};

/// Query pipeline with its collaborators injected once at construction.
///
/// Construct a single engine at process start and share it behind an `Arc`;
/// it holds no per-request state.
pub struct QaEngine {
    embedder: Arc<dyn EmbeddingsProvider>,
    context: Arc<dyn ContextSource>,
    generator: Arc<dyn AnswerProvider>,
    opts: QaOptions,
}

impl QaEngine {
    /// Wires the engine from its three collaborators and options.
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        context: Arc<dyn ContextSource>,
        generator: Arc<dyn AnswerProvider>,
        opts: QaOptions,
    ) -> Self {
        Self {
            embedder,
            context,
            generator,
            opts,
        }
    }

    /// Answers a question from the corpus.
    ///
    /// Returns the generated answer together with the exact chunk texts the
    /// prompt was built from, in retrieval rank order.
    ///
    /// # Errors
    /// - [`QaError::EmptyQuestion`] for a blank question (no external call
    ///   is made);
    /// - [`QaError::NoContext`] when retrieval returns zero records (the
    ///   generation provider is not called);
    /// - [`QaError::Upstream`] when an embedding, store, or generation call
    ///   fails — no retries, no partial result.
    pub async fn answer(&self, question: &str) -> Result<QaAnswer, QaError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QaError::EmptyQuestion);
        }

        debug!("embedding question ({} chars)", question.len());
        let query_vector = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| QaError::upstream(QueryStage::Embed, e))?;

        let hits = self
            .context
            .nearest(query_vector, self.opts.top_k)
            .await
            .map_err(|e| QaError::upstream(QueryStage::Retrieve, e))?;

        if hits.is_empty() {
            info!("no relevant context for question");
            return Err(QaError::NoContext);
        }
        debug!("retrieved {} context chunks", hits.len());

        let context: Vec<String> = hits.into_iter().map(|h| h.text).collect();
        let prompt = prompt::build_prompt(question, &context);

        let answer = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| QaError::upstream(QueryStage::Generate, e))?;

        info!("answered question with {} context chunks", context.len());
        Ok(QaAnswer { answer, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_store::{ScoredChunk, StoreError};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl EmbeddingsProvider for FakeEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    return Err(StoreError::Embedding("embedding down".into()));
                }
                Ok(vec![0.5, 0.5])
            })
        }

        fn embed_batch<'a>(
            &'a self,
            texts: &'a [String],
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>>
        {
            Box::pin(async move { Ok(texts.iter().map(|_| vec![0.5, 0.5]).collect()) })
        }
    }

    struct FakeContext {
        hits: Vec<ScoredChunk>,
    }

    impl ContextSource for FakeContext {
        fn nearest(
            &self,
            _vector: Vec<f32>,
            limit: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredChunk>, StoreError>> + Send + '_>>
        {
            Box::pin(async move {
                Ok(self.hits.iter().take(limit as usize).cloned().collect())
            })
        }
    }

    struct FakeGenerator {
        calls: AtomicUsize,
    }

    impl FakeGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AnswerProvider for FakeGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
        ) -> Pin<
            Box<
                dyn Future<Output = Result<String, Box<dyn std::error::Error + Send + Sync>>>
                    + Send
                    + 'a,
            >,
        > {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("answered from {} chars", prompt.len()))
            })
        }
    }

    fn hit(text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            score,
            text: text.to_string(),
            source: "The Book".to_string(),
            index: 0,
        }
    }

    fn engine(
        embedder: FakeEmbedder,
        hits: Vec<ScoredChunk>,
        generator: Arc<FakeGenerator>,
    ) -> QaEngine {
        QaEngine::new(
            Arc::new(embedder),
            Arc::new(FakeContext { hits }),
            generator,
            QaOptions::default(),
        )
    }

    #[tokio::test]
    async fn empty_question_is_rejected_before_any_call() {
        let embedder = FakeEmbedder::new();
        let generator = Arc::new(FakeGenerator::new());
        let eng = engine(embedder, vec![hit("a", 0.9)], generator.clone());

        let err = eng.answer("   ").await.unwrap_err();
        assert!(matches!(err, QaError::EmptyQuestion));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_corpus_terminates_in_no_context_without_generation() {
        let generator = Arc::new(FakeGenerator::new());
        let eng = engine(FakeEmbedder::new(), vec![], generator.clone());

        let err = eng.answer("What is X?").await.unwrap_err();
        assert!(matches!(err, QaError::NoContext));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answer_returns_context_in_rank_order() {
        let generator = Arc::new(FakeGenerator::new());
        let hits = vec![hit("most similar", 0.95), hit("second", 0.80), hit("third", 0.60)];
        let eng = engine(FakeEmbedder::new(), hits, generator.clone());

        let qa = eng.answer("What does the author argue?").await.unwrap();
        assert_eq!(
            qa.context,
            vec!["most similar", "second", "third"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert!(!qa.answer.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retrieval_respects_top_k() {
        let generator = Arc::new(FakeGenerator::new());
        let hits: Vec<ScoredChunk> = (0..10).map(|i| hit(&format!("c{i}"), 1.0)).collect();
        let eng = QaEngine::new(
            Arc::new(FakeEmbedder::new()),
            Arc::new(FakeContext { hits }),
            generator,
            QaOptions { top_k: 3 },
        );

        let qa = eng.answer("q?").await.unwrap();
        assert_eq!(qa.context.len(), 3);
    }

    #[tokio::test]
    async fn embed_failure_surfaces_stage() {
        let generator = Arc::new(FakeGenerator::new());
        let eng = engine(FakeEmbedder::failing(), vec![hit("a", 0.9)], generator.clone());

        let err = eng.answer("q?").await.unwrap_err();
        match err {
            QaError::Upstream { stage, .. } => assert_eq!(stage, QueryStage::Embed),
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
