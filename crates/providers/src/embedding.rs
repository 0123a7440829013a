//! [`Embedder`] implementations.
//!
//! - [`ProviderEmbedder`]: delegates to a provider's `/embeddings` endpoint
//! - [`HashingEmbedder`]: offline feature hashing, no model download or network

use std::sync::Arc;

use async_trait::async_trait;
use cxbot_core::error::ProviderError;
use cxbot_core::provider::EmbeddingRequest;
use cxbot_core::{Embedder, Provider};

/// Embeds text through a remote provider.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
    label: String,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        let model = model.into();
        let label = format!("{}:{}", provider.name(), model);
        Self {
            provider,
            model,
            label,
        }
    }
}

#[async_trait]
impl Embedder for ProviderEmbedder {
    fn name(&self) -> &str {
        &self.label
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: texts.to_vec(),
            })
            .await?;

        if response.embeddings.len() != texts.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "{} returned {} embeddings for {} inputs",
                self.label,
                response.embeddings.len(),
                texts.len()
            )));
        }
        Ok(response.embeddings)
    }
}

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// Each lowercased alphanumeric word is hashed (FNV-1a) into one of
/// `dimension` buckets with a ±1 sign; the result is L2-normalized, so
/// squared L2 ranking matches cosine ranking. Text with no words maps to
/// the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, ProviderError> {
        if dimension == 0 {
            return Err(ProviderError::NotConfigured(
                "hashing embedder dimension must be > 0".into(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = fnv1a(word.to_lowercase().as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxbot_core::message::Message;
    use cxbot_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};

    fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    #[tokio::test]
    async fn hashing_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let texts = vec!["Refunds within 30 days".to_string()];
        let a = embedder.encode(&texts).await.unwrap();
        let b = embedder.encode(&texts).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a[0].len(), 64);
        let norm: f32 = a[0].iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn hashing_ignores_case_and_punctuation() {
        let embedder = HashingEmbedder::new(32).unwrap();
        let a = embedder.encode_one("Store HOURS?").await.unwrap();
        let b = embedder.encode_one("store hours").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn shared_words_are_closer() {
        let embedder = HashingEmbedder::new(384).unwrap();
        let query = embedder.encode_one("what is the refund policy").await.unwrap();
        let related = embedder
            .encode_one("our refund policy allows returns")
            .await
            .unwrap();
        let unrelated = embedder.encode_one("oat milk latte recipe").await.unwrap();
        assert!(squared_distance(&query, &related) < squared_distance(&query, &unrelated));
    }

    #[tokio::test]
    async fn blank_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        assert_eq!(embedder.encode_one("  ...  ").await.unwrap(), vec![0.0; 8]);
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    struct FixedEmbeddings {
        per_input: usize,
    }

    #[async_trait]
    impl Provider for FixedEmbeddings {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant(""),
                usage: None,
                model: "fixed".into(),
            })
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> Result<EmbeddingResponse, ProviderError> {
            let count = request.inputs.len() * self.per_input;
            Ok(EmbeddingResponse {
                embeddings: vec![vec![0.5, 0.5]; count],
                model: request.model,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn provider_embedder_passes_vectors_through() {
        let embedder = ProviderEmbedder::new(Arc::new(FixedEmbeddings { per_input: 1 }), "m");
        assert_eq!(embedder.name(), "fixed:m");
        let vectors = embedder
            .encode(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
    }

    #[tokio::test]
    async fn provider_embedder_rejects_count_mismatch() {
        let embedder = ProviderEmbedder::new(Arc::new(FixedEmbeddings { per_input: 2 }), "m");
        let err = embedder.encode(&["a".to_string()]).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
