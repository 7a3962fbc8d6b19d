//! Offline ingestion entrypoint.
//!
//! Usage: `ingest <path-to-book.epub>` (or set `BOOK_PATH`). Extracts the
//! book text, chunks it, embeds each batch, and upserts the records into
//! the corpus store. Re-running on the same file overwrites prior records.

use std::{env, error::Error, path::Path, sync::Arc};

use ai_llm_service::service_profiles::LlmServiceProfiles;
use corpus_ingest::{IngestParams, ingest_document};
use corpus_store::{CorpusStore, ProfilesEmbedder, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("BOOK_PATH").ok())
        .ok_or("usage: ingest <path-to-book.epub> (or set BOOK_PATH)")?;
    let path = Path::new(&path);

    // Source label defaults to the file stem, e.g. "Animal Liberation Now".
    let source = env::var("BOOK_SOURCE").ok().unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("book")
            .to_string()
    });

    let svc = Arc::new(LlmServiceProfiles::from_env()?);
    let store_cfg = StoreConfig::from_env()?;
    let embedding_dim = store_cfg.embedding_dim;
    let store = CorpusStore::new(store_cfg)?;
    let embedder = ProfilesEmbedder::new(svc, embedding_dim);

    let mut params = IngestParams::for_source(source);
    if let Some(size) = env_usize("CHUNK_SIZE") {
        params.chunking.chunk_size = size;
    }
    if let Some(overlap) = env_usize("CHUNK_OVERLAP") {
        params.chunking.overlap = overlap;
    }
    if let Some(batch) = env_usize("EMBED_BATCH") {
        params.embed_batch = batch;
    }

    info!(
        source = %params.source,
        chunk_size = params.chunking.chunk_size,
        overlap = params.chunking.overlap,
        "starting ingestion of {:?}",
        path
    );

    let count = ingest_document(&params, path, &embedder, &store).await?;
    info!("ingestion finished: {count} records persisted");

    Ok(())
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
