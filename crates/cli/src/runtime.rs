//! Bootstrap shared by the commands: config, backends, store, orchestrator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cxbot_agent::Orchestrator;
use cxbot_config::AppConfig;
use cxbot_core::{ChatSettings, Embedder};
use cxbot_providers::{ProviderRouter, build_embedder, build_from_config};
use cxbot_rag::{Chunker, Retriever, VectorStore};
use cxbot_security::Redactor;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// The config file a command reads: `--config`, or `~/.cxbot/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> CliResult<AppConfig> {
    let path = config_path(explicit);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Sampling settings for the answer model.
pub fn chat_settings(config: &AppConfig) -> ChatSettings {
    ChatSettings {
        model: config.default_model.clone(),
        temperature: config.default_temperature,
        max_tokens: Some(config.default_max_tokens),
    }
}

/// Configured backends, built once per command.
pub struct Runtime {
    pub config: AppConfig,
    pub router: ProviderRouter,
    pub embedder: Arc<dyn Embedder>,
}

impl Runtime {
    pub fn new(config: AppConfig) -> CliResult<Self> {
        let mut router = build_from_config(&config)?;
        let embedder = build_embedder(&config, &mut router)?;
        Ok(Self {
            config,
            router,
            embedder,
        })
    }

    pub fn chunker(&self) -> CliResult<Chunker> {
        Ok(Chunker::new(
            self.config.rag.chunk_size,
            self.config.rag.chunk_overlap,
        )?)
    }

    /// Load the persisted store from `rag.vector_store_dir`.
    pub fn load_store(&self) -> CliResult<Arc<VectorStore>> {
        let dir = &self.config.rag.vector_store_dir;
        if !VectorStore::exists(dir) {
            return Err(format!(
                "No vector store at {}. Run `cxbot ingest` first.",
                dir.display()
            )
            .into());
        }
        Ok(Arc::new(VectorStore::load(dir)?))
    }

    pub fn retriever(&self, top_k: usize) -> CliResult<Retriever> {
        let store = self.load_store()?;
        Ok(Retriever::new(self.embedder.clone(), store, top_k)?)
    }

    /// Wire redactor, retriever, live-data services and the default provider.
    pub fn orchestrator(&self) -> CliResult<Orchestrator> {
        let provider = self
            .router
            .default()
            .ok_or("No default provider configured")?;
        let retriever = self.retriever(self.config.rag.top_k)?;

        Ok(Orchestrator::new(
            Redactor::new()?,
            retriever,
            cxbot_tools::default_services(),
            provider,
            chat_settings(&self.config),
        ))
    }
}
