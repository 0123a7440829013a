//! `cxbot ask`: answer one customer message through the full pipeline.

use std::path::Path;

use cxbot_agent::ChatRequest;

use crate::runtime::{CliResult, Runtime, load_config};

pub async fn run(
    explicit: Option<&Path>,
    message: String,
    user_id: String,
    lat: f64,
    lon: f64,
    show_sources: bool,
) -> CliResult<()> {
    let config = load_config(explicit)?;

    // Check for API key early, give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GROQ_API_KEY=gsk_...    (default provider)");
        eprintln!("    OPENAI_API_KEY=sk-...   (for OpenAI direct)");
        eprintln!("    CXBOT_API_KEY=...       (generic)");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file.");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let runtime = Runtime::new(config)?;
    let orchestrator = runtime.orchestrator()?;

    let request = ChatRequest {
        user_id,
        message,
        lat,
        lon,
    };

    eprint!("  Thinking...");
    let outcome = orchestrator.handle_detailed(&request).await;
    eprint!("\r              \r");
    let outcome = outcome?;

    println!("{}", outcome.answer);

    if show_sources {
        println!("\nSources:");
        for (rank, source) in outcome.sources.iter().enumerate() {
            println!("  [{rank}] ({:.4}) {}", source.score, source.doc_id);
        }
        println!("  Redactions: {}", outcome.redactions);
        println!("  Request:    {}", outcome.request_id);
    }

    Ok(())
}
