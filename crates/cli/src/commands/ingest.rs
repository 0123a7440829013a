//! `cxbot ingest`: load documents, chunk, embed and persist the vector store.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use cxbot_rag::{build_store, load_documents};

use crate::runtime::{CliResult, Runtime, load_config};

pub async fn run(
    explicit: Option<&Path>,
    docs_override: Option<PathBuf>,
    out_override: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = load_config(explicit)?;
    if let Some(docs) = docs_override {
        config.rag.raw_docs_dir = docs;
    }
    if let Some(out) = out_override {
        config.rag.vector_store_dir = out;
    }

    let runtime = Runtime::new(config)?;
    let rag = &runtime.config.rag;
    let started = Instant::now();

    let documents = load_documents(&rag.raw_docs_dir)?;
    info!(
        dir = %rag.raw_docs_dir.display(),
        documents = documents.len(),
        "Documents loaded"
    );

    let chunker = runtime.chunker()?;
    let (store, report) = build_store(
        &documents,
        &chunker,
        runtime.embedder.as_ref(),
        runtime.config.embedding.batch_size,
    )
    .await?;
    store.persist(&rag.vector_store_dir)?;

    println!("✅ Ingest complete");
    println!("  Documents:  {}", report.documents);
    println!("  Chunks:     {}", report.chunks);
    println!("  Dimension:  {}", report.dimension);
    println!("  Embedder:   {}", runtime.embedder.name());
    println!("  Store:      {}", rag.vector_store_dir.display());
    println!("  Took:       {:.2?}", started.elapsed());

    Ok(())
}
