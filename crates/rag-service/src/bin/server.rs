//! RAG Server binary
//!
//! Run with: cargo run -p rag-service --bin rag-service-server -- --config rag.toml

use clap::Parser;
use rag_service::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Minimal RAG HTTP service
#[derive(Debug, Parser)]
#[command(name = "rag-service-server", version, about)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the vector database file
    #[arg(long)]
    storage_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RagConfig::load(path)?,
        None => RagConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.storage_path {
        config.vector_store.storage_path = path;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Provider: {:?} at {}", config.llm.provider, config.llm.base_url);
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!(
        "  - Vector store: {} ({} dimensions)",
        config.vector_store.storage_path.display(),
        config.vector_store.dimensions
    );

    let server = RagServer::new(config)?;

    if !server.state().check_providers().await {
        tracing::warn!("Model backend not reachable yet; requests will fail until it is");
    }

    tracing::info!("Endpoints:");
    tracing::info!("  POST http://{}/api/rag/documents", server.address());
    tracing::info!("  GET  http://{}/api/rag/ask?question=...", server.address());

    server.start().await?;

    Ok(())
}
