//! Document, chunk and retrieval value objects.
//!
//! These flow through the offline indexing pipeline
//! (Document → Chunk → vector store) and back out of the online retriever
//! as [`RetrievalResult`]s.

use serde::{Deserialize, Serialize};

/// A source document, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (the source path for file-based corpora).
    pub id: String,

    /// Full document text.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A token window extracted from exactly one [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The parent document's id.
    pub doc_id: String,

    /// 0-based position of this window within its document.
    pub chunk_index: usize,

    /// Window text (tokens re-joined with single spaces).
    pub text: String,
}

impl Chunk {
    /// The metadata record persisted alongside this chunk's vector.
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            doc_id: self.doc_id.clone(),
            chunk_id: self.chunk_index,
        }
    }
}

/// Provenance record stored at the same position as a chunk's vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub doc_id: String,
    pub chunk_id: usize,
}

/// A scored passage returned by the retriever.
///
/// `score` is a squared L2 distance: lower means more similar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    pub score: f32,
    pub doc_id: String,
}
