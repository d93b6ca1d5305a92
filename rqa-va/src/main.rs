//! rqa-va (Validation Service)
//!
//! Scores (question, answer) pairs produced by the memory service or the
//! knowledge store. The only outbound call is the factual cross-reference
//! against rqa-ks, bounded by a 3 second timeout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rqa_common::config::{ConfigResolver, Module};
use rqa_common::KnowledgeStoreClient;
use tracing::info;

use rqa_va::validators::factual::REFERENCE_TIMEOUT;
use rqa_va::validators::AnswerValidator;
use rqa_va::{build_router, AppState};

/// Command-line arguments for rqa-va
#[derive(Parser, Debug)]
#[command(name = "rqa-va")]
#[command(about = "Answer validation microservice for RQA")]
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

    /// Knowledge store base URL used for factual cross-referencing
    #[arg(long)]
    knowledge_store_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = ConfigResolver::new(Module::Validation, args.config.as_deref());

    rqa_common::logging::init_tracing(&resolver.log_level())?;

    info!(
        "Starting RQA Validation Service (rqa-va) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let module = resolver.module_config(args.host.as_deref(), args.port);
    let knowledge_store_url = resolver.knowledge_store_url(args.knowledge_store_url.as_deref());
    let llm_configured = resolver.llm_settings().is_configured();

    info!("Knowledge store: {}", knowledge_store_url);
    info!("Language model configured: {}", llm_configured);

    let reference = KnowledgeStoreClient::new(&knowledge_store_url, REFERENCE_TIMEOUT)
        .context("Failed to build knowledge store client")?;
    let validator = AnswerValidator::new(Arc::new(reference));

    let state = AppState::new(validator, llm_configured);
    let app = build_router(state);

    let addr = module.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("rqa-va listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(rqa_common::shutdown::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
