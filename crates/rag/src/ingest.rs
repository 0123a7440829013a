//! Offline index build: documents → chunks → embeddings → [`VectorStore`].

use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use cxbot_core::{Document, Embedder, Error, IndexError, ProviderError, Result};

use crate::chunker::Chunker;
use crate::store::VectorStore;

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Summary of one ingest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub dimension: usize,
}

/// Load every `.txt` and `.md` file under `root`, recursively, sorted by path.
///
/// Document ids are paths relative to `root` with `/` separators. A file that
/// is not valid UTF-8 fails the load with [`Error::MalformedInput`].
pub fn load_documents(root: &Path) -> Result<Vec<Document>> {
    if !root.is_dir() {
        return Err(Error::config(format!(
            "documents directory {} does not exist",
            root.display()
        )));
    }

    let mut paths: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        })
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = read_document(&path)?;

        let id = path
            .strip_prefix(root)
            .unwrap_or(path.as_path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        debug!(doc_id = %id, bytes = text.len(), "Loaded document");
        documents.push(Document::new(id, text));
    }

    Ok(documents)
}

fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| IndexError::Storage(format!("Failed to read {}: {e}", path.display())))?;
    String::from_utf8(bytes)
        .map_err(|_| Error::MalformedInput(format!("{} is not valid UTF-8 text", path.display())))
}

/// Chunk and embed `documents` into a new store.
///
/// Chunks are encoded `batch_size` at a time; each batch must come back with
/// one vector per chunk.
pub async fn build_store(
    documents: &[Document],
    chunker: &Chunker,
    embedder: &dyn Embedder,
    batch_size: usize,
) -> Result<(VectorStore, IngestReport)> {
    if batch_size == 0 {
        return Err(Error::config("embedding batch size must be greater than zero"));
    }

    let chunks: Vec<_> = documents.iter().flat_map(|d| chunker.chunk(d)).collect();
    if chunks.is_empty() {
        return Err(IndexError::Empty.into());
    }
    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        chunk_size = chunker.size(),
        chunk_overlap = chunker.overlap(),
        embedder = embedder.name(),
        "Embedding chunks"
    );

    let mut vectors = Vec::with_capacity(chunks.len());
    for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embedded = embedder.encode(&texts).await?;
        if embedded.len() != texts.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "embedder '{}' returned {} vectors for {} chunks",
                embedder.name(),
                embedded.len(),
                texts.len()
            ))
            .into());
        }
        debug!(batch = batch_no, size = texts.len(), "Embedded batch");
        vectors.extend(embedded);
    }

    let store = VectorStore::build(&chunks, &vectors)?;
    let report = IngestReport {
        documents: documents.len(),
        chunks: store.len(),
        dimension: store.dimension(),
    };
    Ok((store, report))
}
