//! cxbot CLI: the main entry point.
//!
//! Commands:
//! - `init`    Write a default config file
//! - `ingest`  Chunk, embed and persist the document corpus
//! - `search`  Show the passages retrieved for a query
//! - `ask`     Answer one customer message end to end
//! - `serve`   Start the HTTP API server
//! - `status`  Show configuration and vector store status

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod runtime;

#[derive(Parser)]
#[command(
    name = "cxbot",
    about = "cxbot: privacy-preserving retail customer assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.cxbot/config.toml)
    #[arg(short, long, global = true, env = "CXBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Build the vector store from the raw documents directory
    Ingest {
        /// Override `rag.raw_docs_dir`
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Override `rag.vector_store_dir`
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Retrieve the closest passages for a query
    Search {
        /// The query text
        query: String,

        /// Override `rag.top_k`
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Ask the assistant a single question
    Ask {
        /// The customer message
        message: String,

        /// Customer identifier
        #[arg(short, long, default_value = "demo-user")]
        user: String,

        /// Customer latitude
        #[arg(long, default_value_t = 40.7128, allow_hyphen_values = true)]
        lat: f64,

        /// Customer longitude
        #[arg(long, default_value_t = -74.0060, allow_hyphen_values = true)]
        lon: f64,

        /// Also print the retrieved passages
        #[arg(long)]
        sources: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Show configuration and vector store status
    Status {
        /// Also check that the default provider is reachable
        #[arg(long)]
        probe: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force).await?,
        Commands::Ingest { docs, out } => commands::ingest::run(config_path, docs, out).await?,
        Commands::Search { query, top_k } => commands::search::run(config_path, &query, top_k).await?,
        Commands::Ask {
            message,
            user,
            lat,
            lon,
            sources,
        } => commands::ask::run(config_path, message, user, lat, lon, sources).await?,
        Commands::Serve { port, host } => commands::serve::run(config_path, port, host).await?,
        Commands::Status { probe } => commands::status::run(config_path, probe).await?,
    }

    Ok(())
}
