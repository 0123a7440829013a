//! Provider trait: the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation to an LLM and get the complete
//! reply back. The assistant only ever makes single-turn calls
//! (system prompt + user prompt), see [`Provider::chat`].
//!
//! Implementations: OpenAI-compatible endpoints (Groq, OpenAI, OpenRouter,
//! Ollama, vLLM, ...).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.3
}

/// A complete (non-streaming) response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings (e.g., "text-embedding-3-small").
    pub model: String,

    /// The texts to embed.
    pub inputs: Vec<String>,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vectors, one per input text.
    pub embeddings: Vec<Vec<f32>>,

    /// Which model was used.
    pub model: String,

    /// Token usage.
    pub usage: Option<Usage>,
}

/// Sampling settings for a single-turn chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// The core Provider trait.
///
/// Every LLM backend implements this trait. The orchestrator calls
/// [`Provider::chat`] without knowing which provider is being used.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Single-turn chat: system prompt + user prompt in, full completion text out.
    async fn chat(
        &self,
        settings: &ChatSettings,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: settings.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };
        let response = self.complete(request).await?;
        Ok(response.message.content.trim().to_string())
    }

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation returns an error indicating embeddings aren't supported.
    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Echo {
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let reply = format!("  {}\n", request.messages[1].content);
            self.seen.lock().unwrap().push(request);
            Ok(ProviderResponse {
                message: Message::assistant(reply),
                usage: None,
                model: "echo-1".into(),
            })
        }
    }

    #[tokio::test]
    async fn chat_sends_system_then_user_and_trims_reply() {
        let provider = Echo {
            seen: Mutex::new(Vec::new()),
        };
        let settings = ChatSettings {
            model: "echo-1".into(),
            temperature: 0.3,
            max_tokens: Some(512),
        };

        let reply = provider.chat(&settings, "be brief", "hello").await.unwrap();
        assert_eq!(reply, "hello");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].messages[0], Message::system("be brief"));
        assert_eq!(seen[0].messages[1], Message::user("hello"));
        assert_eq!(seen[0].max_tokens, Some(512));
    }

    #[tokio::test]
    async fn embed_is_unsupported_by_default() {
        let provider = Echo {
            seen: Mutex::new(Vec::new()),
        };
        let err = provider
            .embed(EmbeddingRequest {
                model: "m".into(),
                inputs: vec!["x".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
