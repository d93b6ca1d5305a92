//! rqa-ms (Memory/Synthesis Service)
//!
//! Answers questions with knowledge store context and, when an API key is
//! configured, a hosted language model. Falls back to static answers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rqa_common::config::{ConfigResolver, Module};
use rqa_common::KnowledgeStoreClient;
use tracing::info;

use rqa_ms::llm::{LanguageModel, OpenAiChatClient};
use rqa_ms::memory::{MemoryEngine, LOOKUP_TIMEOUT};
use rqa_ms::{build_router, AppState};

/// Timeout for the `/status` knowledge store probe
const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Command-line arguments for rqa-ms
#[derive(Parser, Debug)]
#[command(name = "rqa-ms")]
#[command(about = "Memory and answer synthesis microservice for RQA")]
#[command(version)]
struct Args {
    /// Host to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Knowledge store base URL
    #[arg(long)]
    knowledge_store_url: Option<String>,

    /// Disable the AI memory context
    #[arg(long)]
    no_ai_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = ConfigResolver::new(Module::Memory, args.config.as_deref());

    rqa_common::logging::init_tracing(&resolver.log_level())?;

    info!(
        "Starting RQA Memory/Synthesis Service (rqa-ms) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let module = resolver.module_config(args.host.as_deref(), args.port);
    let knowledge_store_url = resolver.knowledge_store_url(args.knowledge_store_url.as_deref());
    let ai_memory_enabled = resolver.ai_memory_enabled(args.no_ai_memory);
    let llm_settings = resolver.llm_settings();

    let model: Option<Arc<dyn LanguageModel>> = match OpenAiChatClient::from_settings(&llm_settings)
        .context("Failed to build language model client")?
    {
        Some(client) => {
            info!("Language model: {} at {}", llm_settings.model, llm_settings.endpoint);
            Some(Arc::new(client))
        }
        None => {
            info!("Language model not configured, using fallback answers");
            None
        }
    };
    info!("Knowledge store: {}", knowledge_store_url);
    info!("AI memory: {}", if ai_memory_enabled { "enabled" } else { "disabled" });

    let lookup = KnowledgeStoreClient::new(&knowledge_store_url, LOOKUP_TIMEOUT)
        .context("Failed to build knowledge store client")?;
    let status_probe = KnowledgeStoreClient::new(&knowledge_store_url, STATUS_PROBE_TIMEOUT)
        .context("Failed to build knowledge store client")?;

    let engine = MemoryEngine::new(Arc::new(lookup), model, ai_memory_enabled);
    let state = AppState::new(engine, status_probe);
    let app = build_router(state);

    let addr = module.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("rqa-ms listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(rqa_common::shutdown::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
