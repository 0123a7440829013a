//! `cxbot serve`: start the HTTP API server.

use std::path::Path;

use crate::runtime::{CliResult, Runtime, load_config};

pub async fn run(
    explicit: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> CliResult<()> {
    let mut config = load_config(explicit)?;
    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    let runtime = Runtime::new(config)?;
    let orchestrator = runtime.orchestrator()?;
    let gateway = runtime.config.gateway.clone();

    println!("cxbot gateway");
    println!("   Listening: {}:{}", gateway.host, gateway.port);
    println!("   Provider:  {} ({})", orchestrator.provider_name(), orchestrator.settings().model);
    println!("   Passages:  {}", orchestrator.retriever().store().len());
    if !runtime.config.has_api_key() {
        println!("   ⚠️  No API key configured; /chat will fail upstream");
    }

    cxbot_gateway::start(orchestrator, &gateway).await?;

    Ok(())
}
