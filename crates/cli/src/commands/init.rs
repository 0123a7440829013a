//! `cxbot init`: write a default config file.

use std::path::Path;

use cxbot_config::AppConfig;

use crate::runtime::{CliResult, config_path};

pub async fn run(explicit: Option<&Path>, force: bool) -> CliResult<()> {
    let path = config_path(explicit);

    println!("cxbot setup");
    println!("===========\n");

    if path.exists() && !force {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or re-run with --force.\n");
        return Ok(());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Created config at: {}", path.display());

    let config = AppConfig::default();
    println!("\nNext steps:");
    println!("  1. Set GROQ_API_KEY (or CXBOT_API_KEY) in your environment");
    println!(
        "  2. Put .txt / .md documents under {}",
        config.rag.raw_docs_dir.display()
    );
    println!("  3. Run `cxbot ingest`, then `cxbot ask \"...\"` or `cxbot serve`\n");

    Ok(())
}
