//! Online retrieval: embed the (already masked) query, then search the store.

use std::sync::Arc;

use tracing::debug;

use cxbot_core::{Embedder, Error, RetrievalResult, Result};

use crate::store::VectorStore;

/// Embeds queries and returns the nearest stored passages.
///
/// Cheap to clone; the store is shared read-only across requests.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<VectorStore>, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::config("top_k must be greater than zero"));
        }
        Ok(Self {
            embedder,
            store,
            top_k,
        })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Up to `top_k` passages in ascending-distance order.
    ///
    /// A corpus smaller than `top_k` returns everything it has.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalResult>> {
        let vector = self.embedder.encode_one(query).await?;
        let results = self.store.search(&vector, self.top_k)?;
        debug!(
            hits = results.len(),
            top_k = self.top_k,
            best = results.first().map(|r| r.score),
            "Retrieved passages"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("embedder", &self.embedder.name())
            .field("chunks", &self.store.len())
            .field("top_k", &self.top_k)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cxbot_core::{Chunk, IndexError, ProviderError};

    use crate::index::FlatIndex;

    /// Maps a handful of keywords onto fixed axes.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        fn name(&self) -> &str {
            "keyword"
        }

        async fn encode(
            &self,
            texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    vec![
                        t.contains("refund") as u8 as f32,
                        t.contains("hours") as u8 as f32,
                        t.contains("coffee") as u8 as f32,
                    ]
                })
                .collect())
        }
    }

    struct DownEmbedder;

    #[async_trait]
    impl Embedder for DownEmbedder {
        fn name(&self) -> &str {
            "down"
        }

        async fn encode(
            &self,
            _texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    async fn store_of(texts: &[(&str, &str)]) -> Arc<VectorStore> {
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, (doc, text))| Chunk {
                doc_id: (*doc).into(),
                chunk_index: i,
                text: (*text).into(),
            })
            .collect();
        let owned: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = KeywordEmbedder.encode(&owned).await.unwrap();
        Arc::new(VectorStore::build(&chunks, &vectors).unwrap())
    }

    #[tokio::test]
    async fn small_corpus_returns_fewer_than_top_k() {
        let store = store_of(&[
            ("returns.md", "refund policy"),
            ("hours.txt", "store hours"),
            ("menu.txt", "coffee menu"),
        ])
        .await;
        let retriever = Retriever::new(Arc::new(KeywordEmbedder), store, 5).unwrap();

        let results = retriever.retrieve("what are your hours").await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].doc_id, "hours.txt");
        assert!(results.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[tokio::test]
    async fn results_never_exceed_top_k() {
        let store = store_of(&[
            ("a", "refund"),
            ("b", "refund hours"),
            ("c", "coffee"),
            ("d", "hours"),
            ("e", "coffee refund"),
        ])
        .await;
        let retriever = Retriever::new(Arc::new(KeywordEmbedder), store, 2).unwrap();

        for query in ["refund", "hours", "coffee", "nothing relevant"] {
            let results = retriever.retrieve(query).await.unwrap();
            assert!(results.len() <= 2);
        }
        let best = retriever.retrieve("refund please").await.unwrap();
        assert_eq!(best[0].doc_id, "a");
    }

    #[tokio::test]
    async fn empty_store_fails_with_index_error() {
        let store = Arc::new(VectorStore::new(FlatIndex::new(3), vec![], vec![]).unwrap());
        let retriever = Retriever::new(Arc::new(KeywordEmbedder), store, 5).unwrap();
        let err = retriever.retrieve("hours").await.unwrap_err();
        assert!(matches!(err, Error::Index(IndexError::Empty)));
    }

    #[tokio::test]
    async fn embedder_outage_surfaces_as_provider_error() {
        let store = store_of(&[("a", "refund")]).await;
        let retriever = Retriever::new(Arc::new(DownEmbedder), store, 5).unwrap();
        let err = retriever.retrieve("refund").await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::Network(_))));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let store = Arc::new(VectorStore::new(FlatIndex::new(3), vec![], vec![]).unwrap());
        assert!(Retriever::new(Arc::new(KeywordEmbedder), store, 0).is_err());
    }
}
