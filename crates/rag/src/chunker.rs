//! Word-window chunking.
//!
//! Text is split on whitespace and cut into windows of `size` words. Each
//! window starts `size - overlap` words after the previous one, and the
//! final window may be shorter than `size`.

use cxbot_core::{Chunk, Document, Error, Result};

/// Split `text` into overlapping word windows.
///
/// Fails with a configuration error unless `0 < size` and `overlap < size`.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(size, overlap)?.chunk_text(text))
}

/// A validated chunking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("chunk size must be greater than zero"));
        }
        if overlap >= size {
            return Err(Error::config(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Window texts in document order. Empty or whitespace-only text yields none.
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        self.windows(text)
            .into_iter()
            .map(|words| words.join(" "))
            .collect()
    }

    /// Chunks of `document`, numbered from zero.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.chunk_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk {
                doc_id: document.id.clone(),
                chunk_index,
                text,
            })
            .collect()
    }

    fn windows<'a>(&self, text: &'a str) -> Vec<Vec<&'a str>> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let step = self.size - self.overlap;

        let mut windows = Vec::new();
        let mut start = 0;
        while start < tokens.len() {
            let end = (start + self.size).min(tokens.len());
            windows.push(tokens[start..end].to_vec());
            if end == tokens.len() {
                break;
            }
            start += step;
        }
        windows
    }
}
