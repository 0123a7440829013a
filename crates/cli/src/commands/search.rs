//! `cxbot search`: print the passages retrieved for a query.

use std::path::Path;

use crate::runtime::{CliResult, Runtime, load_config};

/// Characters of passage text shown per hit.
const PREVIEW_CHARS: usize = 160;

pub async fn run(explicit: Option<&Path>, query: &str, top_k: Option<usize>) -> CliResult<()> {
    let config = load_config(explicit)?;
    let top_k = top_k.unwrap_or(config.rag.top_k);
    let runtime = Runtime::new(config)?;
    let retriever = runtime.retriever(top_k)?;

    let results = retriever.retrieve(query).await?;
    if results.is_empty() {
        println!("No passages found.");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        println!("[{rank}] ({:.4}) {}", result.score, result.doc_id);
        println!("    {}\n", preview(&result.text));
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
