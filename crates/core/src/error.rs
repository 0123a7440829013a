//! Error types for the cxbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] aggregates them so a
//! request fails with exactly one error signal.

use thiserror::Error;

/// The top-level error type for all cxbot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Configuration errors (invalid chunk/overlap settings, bad config file) ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Vector index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Upstream model errors (embedding or LLM backend) ---
    #[error("Upstream unavailable: {0}")]
    Provider(#[from] ProviderError),

    // --- Live-data lookups ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Input that is not usable text ---
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Vector index is empty")]
    Empty,

    #[error("Vector index is corrupt: {0}")]
    Corrupt(String),

    #[error("Dimension mismatch: index has {expected}, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether the backend could not be reached at all (as opposed to
    /// answering with something we could not use).
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. }
        ) || matches!(self, Self::ApiError { status_code, .. } if *status_code >= 500)
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid lookup arguments: {0}")]
    InvalidArguments(String),
}
