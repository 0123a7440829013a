//! The vector store: an index plus its position-aligned provenance.
//!
//! Position `i` in the index, the metadata list and the chunk-text list
//! always describes the same chunk. The store is written once by ingest and
//! only read while serving.
//!
//! Files under the store directory:
//! - `index.bin`: the [`FlatIndex`] binary
//! - `metadata.json`: pretty JSON array of `{"doc_id", "chunk_id"}`
//! - `chunks.jsonl`: one `{"text": ...}` object per line

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cxbot_core::{Chunk, ChunkMetadata, IndexError, RetrievalResult};

use crate::index::FlatIndex;

pub const INDEX_FILE: &str = "index.bin";
pub const METADATA_FILE: &str = "metadata.json";
pub const CHUNKS_FILE: &str = "chunks.jsonl";

#[derive(Debug, Serialize, Deserialize)]
struct ChunkRecord {
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    index: FlatIndex,
    metadata: Vec<ChunkMetadata>,
    chunks: Vec<String>,
}

impl VectorStore {
    /// Assemble a store from its three parts, which must be the same length.
    pub fn new(
        index: FlatIndex,
        metadata: Vec<ChunkMetadata>,
        chunks: Vec<String>,
    ) -> Result<Self, IndexError> {
        if index.len() != metadata.len() || metadata.len() != chunks.len() {
            return Err(IndexError::Corrupt(format!(
                "misaligned store: {} vectors, {} metadata records, {} chunk texts",
                index.len(),
                metadata.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            index,
            metadata,
            chunks,
        })
    }

    /// Build from chunks and their embeddings, in the same order.
    pub fn build(chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        let index = FlatIndex::build(vectors)?;
        Self::new(
            index,
            chunks.iter().map(Chunk::metadata).collect(),
            chunks.iter().map(|c| c.text.clone()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn metadata(&self) -> &[ChunkMetadata] {
        &self.metadata
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Number of distinct source documents.
    pub fn document_count(&self) -> usize {
        let mut ids: Vec<&str> = self.metadata.iter().map(|m| m.doc_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Top-`k` passages for an already-embedded query, nearest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalResult>, IndexError> {
        self.index
            .search(query, k)?
            .into_iter()
            .map(|(position, score)| {
                let text = self.chunks.get(position);
                let meta = self.metadata.get(position);
                match (text, meta) {
                    (Some(text), Some(meta)) => Ok(RetrievalResult {
                        text: text.clone(),
                        score,
                        doc_id: meta.doc_id.clone(),
                    }),
                    _ => Err(IndexError::Corrupt(format!(
                        "index returned position {position} with no stored chunk"
                    ))),
                }
            })
            .collect()
    }

    /// Whether `dir` holds all three store files.
    pub fn exists(dir: &Path) -> bool {
        [INDEX_FILE, METADATA_FILE, CHUNKS_FILE]
            .iter()
            .all(|name| dir.join(name).is_file())
    }

    /// Write all three files into `dir`, creating it if needed.
    pub fn persist(&self, dir: &Path) -> Result<(), IndexError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            IndexError::Storage(format!("Failed to create {}: {e}", dir.display()))
        })?;

        self.index.persist(&dir.join(INDEX_FILE))?;

        let metadata = serde_json::to_string_pretty(&self.metadata)
            .map_err(|e| IndexError::Storage(format!("Failed to serialize metadata: {e}")))?;
        write_file(&dir.join(METADATA_FILE), &metadata)?;

        let mut lines = String::new();
        for text in &self.chunks {
            let record = ChunkRecord { text: text.clone() };
            let line = serde_json::to_string(&record)
                .map_err(|e| IndexError::Storage(format!("Failed to serialize chunk: {e}")))?;
            lines.push_str(&line);
            lines.push('\n');
        }
        write_file(&dir.join(CHUNKS_FILE), &lines)?;

        info!(dir = %dir.display(), chunks = self.len(), "Vector store persisted");
        Ok(())
    }

    /// Load a store previously written by [`VectorStore::persist`].
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let index = FlatIndex::load(&dir.join(INDEX_FILE))?;

        let metadata_path = dir.join(METADATA_FILE);
        let metadata: Vec<ChunkMetadata> = serde_json::from_str(&read_file(&metadata_path)?)
            .map_err(|e| {
                IndexError::Corrupt(format!("{}: {e}", metadata_path.display()))
            })?;

        let chunks_path = dir.join(CHUNKS_FILE);
        let chunks = read_file(&chunks_path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(n, line)| {
                serde_json::from_str::<ChunkRecord>(line)
                    .map(|r| r.text)
                    .map_err(|e| {
                        IndexError::Corrupt(format!(
                            "{} line {}: {e}",
                            chunks_path.display(),
                            n + 1
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let store = Self::new(index, metadata, chunks)?;
        debug!(dir = %dir.display(), chunks = store.len(), dimension = store.dimension(), "Vector store loaded");
        Ok(store)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), IndexError> {
    std::fs::write(path, content)
        .map_err(|e| IndexError::Storage(format!("Failed to write {}: {e}", path.display())))
}

fn read_file(path: &Path) -> Result<String, IndexError> {
    std::fs::read_to_string(path)
        .map_err(|e| IndexError::Storage(format!("Failed to read {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(doc: &str, i: usize, text: &str) -> Chunk {
        Chunk {
            doc_id: doc.into(),
            chunk_index: i,
            text: text.into(),
        }
    }

    fn three_chunk_store() -> VectorStore {
        let chunks = vec![
            chunk("returns.md", 0, "refunds within 30 days"),
            chunk("returns.md", 1, "keep your receipt"),
            chunk("hours.txt", 0, "open 7am to 9pm"),
        ];
        let vectors = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
        VectorStore::build(&chunks, &vectors).unwrap()
    }

    #[test]
    fn build_keeps_parts_aligned() {
        let store = three_chunk_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.metadata().len(), 3);
        assert_eq!(store.chunks().len(), 3);
        assert_eq!(store.metadata()[2].doc_id, "hours.txt");
        assert_eq!(store.chunks()[2], "open 7am to 9pm");
        assert_eq!(store.document_count(), 2);
    }

    #[test]
    fn build_rejects_vector_count_mismatch() {
        let chunks = vec![chunk("a", 0, "x"), chunk("a", 1, "y")];
        let err = VectorStore::build(&chunks, &[vec![1.0]]).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt(_)));
    }

    #[test]
    fn search_maps_positions_to_passages() {
        let store = three_chunk_store();
        let results = store.search(&[0.0, 1.0], 5).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].doc_id, "hours.txt");
        assert_eq!(results[0].text, "open 7am to 9pm");
        assert_eq!(results[0].score, 0.0);
        assert!(results.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_chunk_store();
        store.persist(dir.path()).unwrap();

        assert!(VectorStore::exists(dir.path()));
        let loaded = VectorStore::load(dir.path()).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn metadata_file_uses_doc_and_chunk_ids() {
        let dir = tempfile::tempdir().unwrap();
        three_chunk_store().persist(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[1]["doc_id"], "returns.md");
        assert_eq!(value[1]["chunk_id"], 1);

        let lines = std::fs::read_to_string(dir.path().join(CHUNKS_FILE)).unwrap();
        let first: serde_json::Value = serde_json::from_str(lines.lines().next().unwrap()).unwrap();
        assert_eq!(first["text"], "refunds within 30 days");
    }

    #[test]
    fn load_detects_misaligned_files() {
        let dir = tempfile::tempdir().unwrap();
        three_chunk_store().persist(dir.path()).unwrap();

        let path = dir.path().join(CHUNKS_FILE);
        let content = std::fs::read_to_string(&path).unwrap();
        let kept: Vec<&str> = content.lines().take(2).collect();
        std::fs::write(&path, kept.join("\n")).unwrap();

        assert!(matches!(
            VectorStore::load(dir.path()),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn load_rejects_garbled_chunk_line() {
        let dir = tempfile::tempdir().unwrap();
        three_chunk_store().persist(dir.path()).unwrap();
        std::fs::write(dir.path().join(CHUNKS_FILE), "{\"text\": \"ok\"}\nnot json\n").unwrap();

        assert!(matches!(
            VectorStore::load(dir.path()),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn load_from_missing_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(!VectorStore::exists(&missing));
        assert!(matches!(
            VectorStore::load(&missing),
            Err(IndexError::Storage(_))
        ));
    }
}
