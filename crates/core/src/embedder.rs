//! Embedder trait: the abstraction over text embedding models.
//!
//! The core never looks inside the model; it only relies on
//! `encode(texts) -> vectors` returning one fixed-dimension vector per input.

use async_trait::async_trait;

use crate::error::ProviderError;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// A human-readable name for logs (e.g., "hashing", "openai:text-embedding-3-small").
    fn name(&self) -> &str;

    /// Encode a batch of texts. Implementations must return exactly one
    /// vector per input, all of the same dimension.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// Encode a single text.
    async fn encode_one(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vectors = self.encode(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(ProviderError::InvalidResponse(format!(
                "embedder '{}' returned {} vectors for 1 input",
                self.name(),
                vectors.len()
            )));
        }
        Ok(vectors.remove(0))
    }
}
