//! End-to-end ingestion pipeline: chunk → embed per batch → upsert.
//!
//! The loop is strictly sequential: one in-flight embedding request and one
//! in-flight store write at a time, which bounds call volume against
//! rate-limited services and keeps progress reporting accurate. A failing
//! batch aborts the run; batches persisted before the failure stay in the
//! store, and re-running is idempotent because record ids are deterministic.

use std::{future::Future, pin::Pin};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use corpus_store::{CorpusRecord, CorpusStore, EmbeddingsProvider, StoreError};

use crate::chunker::{ChunkParams, split_text};
use crate::errors::IngestError;

/// Parameters for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestParams {
    /// Chunking configuration.
    pub chunking: ChunkParams,
    /// Number of chunks embedded per upstream call. Small by design to
    /// respect embedding-service batch limits.
    pub embed_batch: usize,
    /// Source label stored with every record (e.g., the book title).
    pub source: String,
}

impl IngestParams {
    /// Creates parameters with default chunking and batch size for a source
    /// label.
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            chunking: ChunkParams::default(),
            embed_batch: 5,
            source: source.into(),
        }
    }

    /// Validates parameter invariants.
    ///
    /// # Errors
    /// Returns `IngestError::Config` on a zero batch size or invalid
    /// chunking parameters.
    pub fn validate(&self) -> Result<(), IngestError> {
        self.chunking.validate()?;
        if self.embed_batch == 0 {
            return Err(IngestError::Config("embed_batch must be > 0".into()));
        }
        if self.source.trim().is_empty() {
            return Err(IngestError::Config("source label is empty".into()));
        }
        Ok(())
    }
}

/// Write side of the corpus store, as seen by the pipeline.
///
/// `CorpusStore` is the production implementation; tests substitute fakes.
pub trait ChunkSink: Send + Sync {
    /// Prepares the backing collection (idempotent).
    fn ready(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Persists one batch of records, returning how many were written.
    fn persist<'a>(
        &'a self,
        records: Vec<CorpusRecord>,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>>;
}

impl ChunkSink for CorpusStore {
    fn ready(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(self.ensure_ready())
    }

    fn persist<'a>(
        &'a self,
        records: Vec<CorpusRecord>,
    ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>> {
        Box::pin(async move { self.upsert(&records).await })
    }
}

/// Ingests the extracted text of one corpus document.
///
/// Chunks the text, then for each batch requests embeddings in a single
/// call and upserts the resulting records keyed `chunk_<global index>`.
/// Reports cumulative progress after every batch.
///
/// Returns the number of persisted records.
///
/// # Errors
/// Returns `IngestError::Config` for invalid parameters, or the wrapped
/// embedding/store error of the first failing batch. Earlier batches remain
/// persisted.
pub async fn ingest_text(
    params: &IngestParams,
    text: &str,
    provider: &dyn EmbeddingsProvider,
    sink: &dyn ChunkSink,
) -> Result<u64, IngestError> {
    params.validate()?;

    let chunks = split_text(text, &params.chunking);
    if chunks.is_empty() {
        debug!("nothing to ingest: empty text");
        return Ok(0);
    }
    let total = chunks.len();
    info!("ingesting {} chunks from '{}'", total, params.source);

    sink.ready().await?;

    let batch_count = total.div_ceil(params.embed_batch);
    let pb = ProgressBar::new(batch_count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("##-"),
    );

    let mut persisted: u64 = 0;
    for (batch_no, batch) in chunks.chunks(params.embed_batch).enumerate() {
        let texts: Vec<String> = batch.to_vec();
        let vectors = provider.embed_batch(&texts).await?;

        let base = batch_no * params.embed_batch;
        let records: Vec<CorpusRecord> = texts
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(j, (text, embedding))| {
                let index = base + j;
                CorpusRecord {
                    id: format!("chunk_{index}"),
                    text,
                    source: params.source.clone(),
                    index,
                    embedding,
                }
            })
            .collect();

        persisted += sink.persist(records).await?;
        pb.inc(1);
        info!("progress: {}/{} chunks persisted", persisted, total);
    }

    pb.finish_and_clear();
    info!("ingestion complete: {} records", persisted);
    Ok(persisted)
}

/// Convenience wrapper: extract a document from disk, then ingest it.
///
/// # Errors
/// Propagates extraction and ingestion errors.
pub async fn ingest_document(
    params: &IngestParams,
    path: &std::path::Path,
    provider: &dyn EmbeddingsProvider,
    sink: &dyn ChunkSink,
) -> Result<u64, IngestError> {
    let text = crate::extract::extract_document(path)?;
    ingest_text(params, &text, provider, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DIM: usize = 4;

    /// Embedding fake: returns a constant-dimension vector per input, or
    /// fails on a configured call number.
    struct FakeEmbedder {
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl FakeEmbedder {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: Some(call),
            }
        }
    }

    impl EmbeddingsProvider for FakeEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            Box::pin(async move { Ok(vec![0.0; DIM]) })
        }

        fn embed_batch<'a>(
            &'a self,
            texts: &'a [String],
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>>
        {
            Box::pin(async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if self.fail_on_call == Some(call) {
                    return Err(StoreError::Embedding("embedding service down".into()));
                }
                Ok(texts.iter().map(|_| vec![0.0; DIM]).collect())
            })
        }
    }

    /// Sink fake recording every persisted batch.
    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Vec<CorpusRecord>>>,
    }

    impl RecordingSink {
        fn all_records(&self) -> Vec<CorpusRecord> {
            self.batches.lock().unwrap().iter().flatten().cloned().collect()
        }
    }

    impl ChunkSink for RecordingSink {
        fn ready(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
            Box::pin(async { Ok(()) })
        }

        fn persist<'a>(
            &'a self,
            records: Vec<CorpusRecord>,
        ) -> Pin<Box<dyn Future<Output = Result<u64, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                let n = records.len() as u64;
                self.batches.lock().unwrap().push(records);
                Ok(n)
            })
        }
    }

    fn small_params() -> IngestParams {
        IngestParams {
            chunking: ChunkParams {
                chunk_size: 20,
                overlap: 4,
            },
            embed_batch: 5,
            source: "Test Book".into(),
        }
    }

    #[tokio::test]
    async fn ingests_all_chunks_with_deterministic_ids() {
        let params = small_params();
        let embedder = FakeEmbedder::ok();
        let sink = RecordingSink::default();

        let text = "Sentence one here. Sentence two here. Sentence three here. \
                    Sentence four here. Sentence five here."
            .to_string();
        let n = ingest_text(&params, &text, &embedder, &sink).await.unwrap();

        let records = sink.all_records();
        assert_eq!(n as usize, records.len());
        assert!(n > 0);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.id, format!("chunk_{i}"));
            assert_eq!(r.index, i);
            assert_eq!(r.source, "Test Book");
            assert_eq!(r.embedding.len(), DIM);
        }
    }

    #[tokio::test]
    async fn reingestion_produces_identical_ids_and_content() {
        let params = small_params();
        let text = "Alpha beta gamma delta epsilon zeta eta theta iota kappa.".repeat(3);

        let sink_a = RecordingSink::default();
        ingest_text(&params, &text, &FakeEmbedder::ok(), &sink_a)
            .await
            .unwrap();
        let sink_b = RecordingSink::default();
        ingest_text(&params, &text, &FakeEmbedder::ok(), &sink_b)
            .await
            .unwrap();

        let a = sink_a.all_records();
        let b = sink_b.all_records();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.text, y.text);
        }
    }

    #[tokio::test]
    async fn empty_text_persists_nothing() {
        let params = small_params();
        let sink = RecordingSink::default();
        let n = ingest_text(&params, "", &FakeEmbedder::ok(), &sink)
            .await
            .unwrap();
        assert_eq!(n, 0);
        assert!(sink.all_records().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_aborts_but_keeps_prior_batches() {
        let mut params = small_params();
        params.embed_batch = 2;
        // Enough text for well over three batches of two chunks.
        let text = "one two three four five six seven eight nine ten. ".repeat(10);

        let embedder = FakeEmbedder::failing_on(3);
        let sink = RecordingSink::default();
        let err = ingest_text(&params, &text, &embedder, &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Store(StoreError::Embedding(_))));
        // Exactly the two successful batches were persisted, nothing partial.
        assert_eq!(sink.batches.lock().unwrap().len(), 2);
        assert_eq!(sink.all_records().len(), 4);
    }

    #[tokio::test]
    async fn invalid_params_fail_before_any_call() {
        let mut params = small_params();
        params.chunking.overlap = params.chunking.chunk_size;
        let embedder = FakeEmbedder::ok();
        let sink = RecordingSink::default();

        let err = ingest_text(&params, "text", &embedder, &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert!(sink.all_records().is_empty());
    }
}
