//! LLM provider and embedder implementations for cxbot.
//!
//! All chat backends implement the `cxbot_core::Provider` trait and all
//! embedding backends implement `cxbot_core::Embedder`. The router selects
//! the correct ones based on configuration.

pub mod embedding;
pub mod openai_compat;
pub mod router;

pub use embedding::{HashingEmbedder, ProviderEmbedder};
pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_embedder, build_from_config};
