//! rqa-ks (Knowledge Store Service)
//!
//! Similarity search over stored question/answer pairs, entry insertion and
//! interaction logging, backed by SQLite.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rqa_common::config::{ConfigResolver, Module};
use tracing::info;

use rqa_ks::db::{init_database, DATABASE_FILE};
use rqa_ks::embedding::{HashingEncoder, EMBEDDING_MODEL};
use rqa_ks::{build_router, AppState};

/// Command-line arguments for rqa-ks
#[derive(Parser, Debug)]
#[command(name = "rqa-ks")]
#[command(about = "Knowledge store microservice for RQA")]
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

    /// Folder holding knowledge.db
    #[arg(short, long)]
    data_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = ConfigResolver::new(Module::KnowledgeStore, args.config.as_deref());

    rqa_common::logging::init_tracing(&resolver.log_level())?;

    info!(
        "Starting RQA Knowledge Store Service (rqa-ks) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let module = resolver.module_config(args.host.as_deref(), args.port);
    let data_folder = resolver.data_folder(args.data_folder.as_deref());
    let db_path = data_folder.join(DATABASE_FILE);
    info!("Data folder: {}", data_folder.display());
    info!("Embedding model: {}", EMBEDDING_MODEL);

    let encoder = HashingEncoder::default();
    let pool = init_database(&db_path, &encoder)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let state = AppState::new(pool, encoder);
    let app = build_router(state);

    let addr = module.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("rqa-ks listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(rqa_common::shutdown::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
