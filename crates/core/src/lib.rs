//! # cxbot core
//!
//! Domain types, traits, and error definitions for the cxbot customer
//! assistant. This crate has **no framework dependencies**: it defines the
//! model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (language model, embedding model, store and
//! account lookups) is a trait here. Implementations live in their own
//! crates and are injected into the orchestrator, which keeps:
//! - backends swappable via configuration
//! - tests free to use hand-written doubles
//! - the dependency graph pointing inward at core

pub mod document;
pub mod embedder;
pub mod error;
pub mod message;
pub mod provider;
pub mod retail;

// Re-export key types at crate root for ergonomics
pub use document::{Chunk, ChunkMetadata, Document, RetrievalResult};
pub use embedder::Embedder;
pub use error::{Error, IndexError, ProviderError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{ChatSettings, Provider, ProviderRequest, ProviderResponse, Usage};
pub use retail::{
    Coupon, CouponService, Order, OrderService, ProfileService, Store, StoreLocator,
};
