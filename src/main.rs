use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dirsage::agent::Agent;
use dirsage::config;
use dirsage::ollama::OllamaClient;

/// Ask a locally running model questions about the current directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The question to ask; defaults to a one-line directory summary.
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (for OLLAMA_URL / DIRSAGE_MODEL overrides).
    dotenvy::dotenv().ok();

    // Logs go to stderr so the answer panel owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dirsage=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let query = cli
        .query
        .unwrap_or_else(|| config::DEFAULT_QUERY.to_string());
    info!(%query, "dirsage starting");

    let agent = Agent::new(OllamaClient::from_env());
    agent.answer_query(&query).await;

    Ok(())
}
