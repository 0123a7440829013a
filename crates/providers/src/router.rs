//! Provider router: selects the chat provider and embedder based on config.

use std::collections::HashMap;
use std::sync::Arc;

use cxbot_config::AppConfig;
use cxbot_core::error::ProviderError;
use cxbot_core::{Embedder, Provider};

use crate::embedding::{HashingEmbedder, ProviderEmbedder};
use crate::openai_compat::OpenAiCompatProvider;

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build providers from configuration.
///
/// Every `[providers.<name>]` table is registered, and the default provider is
/// always present even when it has no table of its own. A provider that is not
/// well known must set `api_url`.
pub fn build_from_config(config: &AppConfig) -> Result<ProviderRouter, ProviderError> {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();
        let base_url = base_url_for(name, provider_config.api_url.as_deref())?;

        router.register(
            name.clone(),
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)),
        );
    }

    if router.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = base_url_for(&config.default_provider, None)?;
        router.register(
            config.default_provider.clone(),
            Arc::new(OpenAiCompatProvider::new(
                &config.default_provider,
                base_url,
                api_key,
            )),
        );
    }

    Ok(router)
}

/// Build the embedder named by `[embedding].provider`.
///
/// `"hashing"` is local; any other name is looked up in the router, registering
/// an OpenAI-compatible client for it when the config has no table for it.
pub fn build_embedder(
    config: &AppConfig,
    router: &mut ProviderRouter,
) -> Result<Arc<dyn Embedder>, ProviderError> {
    let name = config.embedding.provider.as_str();
    if name == "hashing" {
        return Ok(Arc::new(HashingEmbedder::new(config.embedding.dimension)?));
    }

    let provider = match router.get(name) {
        Some(provider) => provider,
        None => {
            let api_key = config.api_key.clone().unwrap_or_default();
            let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::new(
                name,
                base_url_for(name, None)?,
                api_key,
            ));
            router.register(name, provider.clone());
            provider
        }
    };

    Ok(Arc::new(ProviderEmbedder::new(
        provider,
        &config.embedding.model,
    )))
}

fn base_url_for(provider_name: &str, api_url: Option<&str>) -> Result<String, ProviderError> {
    api_url
        .map(str::to_string)
        .or_else(|| default_base_url(provider_name).map(str::to_string))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "provider '{provider_name}' has no api_url and no known default"
            ))
        })
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "groq" => "https://api.groq.com/openai/v1",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url)
}
