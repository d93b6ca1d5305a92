//! Database access for rqa-ks
//!
//! SQLite file `<data_folder>/knowledge.db`, created on first run.

pub mod entries;
pub mod interactions;

use rqa_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::embedding::HashingEncoder;
use crate::topics::TOPIC_ANSWERS;
use entries::KnowledgeEntry;

/// Database file name inside the data folder
pub const DATABASE_FILE: &str = "knowledge.db";

/// Open (creating if needed) the knowledge database
pub async fn init_database(db_path: &Path, encoder: &HashingEncoder) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Concurrent readers alongside the single writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;
    seed_topic_answers(&pool, encoder).await?;

    Ok(pool)
}

/// In-memory database with the schema and seed data
///
/// Limited to one connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn init_memory_database(encoder: &HashingEncoder) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;
    seed_topic_answers(&pool, encoder).await?;
    Ok(pool)
}

/// Create tables if they don't exist (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS knowledge_entries (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            embedding BLOB NOT NULL,
            confidence_score REAL NOT NULL,
            source_type TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            brand TEXT NOT NULL DEFAULT '',
            product_category TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interactions (
            id TEXT PRIMARY KEY,
            query TEXT NOT NULL,
            answer TEXT NOT NULL,
            source TEXT NOT NULL,
            confidence REAL NOT NULL,
            timestamp TEXT NOT NULL,
            processing_time_ms INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_knowledge_entries_source ON knowledge_entries(source_type)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert the built-in topic answers into an empty entries table
///
/// Returns the number of entries inserted (0 when the table already had data).
pub async fn seed_topic_answers(pool: &SqlitePool, encoder: &HashingEncoder) -> Result<usize> {
    if entries::count_entries(pool).await? > 0 {
        return Ok(0);
    }

    for topic in TOPIC_ANSWERS {
        let mut entry = KnowledgeEntry::new(
            topic.question.to_string(),
            topic.answer.to_string(),
            encoder,
        );
        entry.confidence_score = topic.confidence;
        entry.source_type = "manual".to_string();
        entry.brand = "General".to_string();
        entry.product_category = "All Products".to_string();
        entry.tags = serde_json::to_string(topic.tags)
            .map_err(|e| rqa_common::Error::Internal(e.to_string()))?;
        entries::insert_entry(pool, &entry).await?;
    }

    info!("Seeded {} built-in knowledge entries", TOPIC_ANSWERS.len());
    Ok(TOPIC_ANSWERS.len())
}
