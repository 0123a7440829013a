//! `cxbot status`: show configuration and vector store status.

use std::path::Path;

use cxbot_providers::build_from_config;
use cxbot_rag::VectorStore;

use crate::runtime::{CliResult, config_path, load_config};

pub async fn run(explicit: Option<&Path>, probe: bool) -> CliResult<()> {
    let config = load_config(explicit)?;
    let path = config_path(explicit);

    println!("cxbot status");
    println!("============");
    println!("  Config:       {}", path.display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  API key:      {}", if config.has_api_key() { "set" } else { "missing" });
    println!(
        "  Embedding:    {} ({})",
        config.embedding.provider, config.embedding.model
    );
    println!(
        "  Chunking:     {} words, {} overlap, top {}",
        config.rag.chunk_size, config.rag.chunk_overlap, config.rag.top_k
    );
    println!("  Documents:    {}", config.rag.raw_docs_dir.display());
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    let store_dir = &config.rag.vector_store_dir;
    if VectorStore::exists(store_dir) {
        match VectorStore::load(store_dir) {
            Ok(store) => println!(
                "\n  ✅ Vector store: {} chunks from {} documents (dim {})",
                store.len(),
                store.document_count(),
                store.dimension()
            ),
            Err(e) => println!("\n  ⚠️  Vector store at {} is unreadable: {e}", store_dir.display()),
        }
    } else {
        println!("\n  ⚠️  No vector store at {}. Run `cxbot ingest`", store_dir.display());
    }

    if path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file. Run `cxbot init` first");
    }

    if probe {
        let router = build_from_config(&config)?;
        let provider = router
            .default()
            .ok_or("No default provider configured")?;
        match provider.health_check().await {
            Ok(true) => println!("  ✅ Provider {} reachable", provider.name()),
            Ok(false) => println!("  ⚠️  Provider {} answered with an error", provider.name()),
            Err(e) if e.is_unavailable() => {
                println!("  ⚠️  Provider {} unreachable: {e}", provider.name())
            }
            Err(e) => println!("  ⚠️  Provider {} check failed: {e}", provider.name()),
        }
    }

    Ok(())
}
