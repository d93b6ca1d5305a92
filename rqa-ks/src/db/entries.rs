//! Knowledge entry persistence

use chrono::Utc;
use rqa_common::{Error, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::embedding::{self, HashingEncoder};

/// Confidence given to entries added without one
pub const DEFAULT_ENTRY_CONFIDENCE: f64 = 0.8;

/// Source type given to entries added at runtime without one
pub const DEFAULT_ENTRY_SOURCE: &str = "real_time_manual";

/// Stored question/answer pair
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
    pub confidence_score: f64,
    pub source_type: String,
    pub timestamp: String,
    pub brand: String,
    pub product_category: String,
    /// JSON array text
    pub tags: String,
}

impl KnowledgeEntry {
    /// New entry with defaults; the embedding encodes "Question: <q> Answer: <a>"
    pub fn new(question: String, answer: String, encoder: &HashingEncoder) -> Self {
        let embedding = encoder.encode(&embedding_text(&question, &answer));
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            embedding,
            confidence_score: DEFAULT_ENTRY_CONFIDENCE,
            source_type: DEFAULT_ENTRY_SOURCE.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            brand: String::new(),
            product_category: String::new(),
            tags: "[]".to_string(),
        }
    }
}

/// Text embedded for an entry
pub fn embedding_text(question: &str, answer: &str) -> String {
    format!("Question: {} Answer: {}", question, answer)
}

/// Save entry to database
pub async fn insert_entry(pool: &SqlitePool, entry: &KnowledgeEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO knowledge_entries (
            id, question, answer, embedding, confidence_score, source_type,
            timestamp, brand, product_category, tags
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.id.to_string())
    .bind(&entry.question)
    .bind(&entry.answer)
    .bind(embedding::to_bytes(&entry.embedding))
    .bind(entry.confidence_score)
    .bind(&entry.source_type)
    .bind(&entry.timestamp)
    .bind(&entry.brand)
    .bind(&entry.product_category)
    .bind(&entry.tags)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load every entry (the vector search scans them all)
pub async fn load_entries(pool: &SqlitePool) -> Result<Vec<KnowledgeEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT id, question, answer, embedding, confidence_score, source_type,
               timestamp, brand, product_category, tags
        FROM knowledge_entries
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<KnowledgeEntry> {
            let id: String = row.get("id");
            let blob: Vec<u8> = row.get("embedding");
            Ok(KnowledgeEntry {
                id: Uuid::parse_str(&id)
                    .map_err(|e| Error::Internal(format!("bad entry id {}: {}", id, e)))?,
                question: row.get("question"),
                answer: row.get("answer"),
                embedding: embedding::from_bytes(&blob),
                confidence_score: row.get("confidence_score"),
                source_type: row.get("source_type"),
                timestamp: row.get("timestamp"),
                brand: row.get("brand"),
                product_category: row.get("product_category"),
                tags: row.get("tags"),
            })
        })
        .collect()
}

pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_entries")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Aggregate view of the entries table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntryStats {
    pub total_entries: i64,
    pub source_types: BTreeMap<String, i64>,
    pub avg_confidence: f64,
}

pub async fn entry_stats(pool: &SqlitePool) -> Result<EntryStats> {
    let rows = sqlx::query(
        "SELECT source_type, COUNT(*) AS n FROM knowledge_entries GROUP BY source_type",
    )
    .fetch_all(pool)
    .await?;
    let source_types: BTreeMap<String, i64> = rows
        .iter()
        .map(|row| (row.get("source_type"), row.get("n")))
        .collect();

    let avg_confidence: Option<f64> =
        sqlx::query_scalar("SELECT AVG(confidence_score) FROM knowledge_entries")
            .fetch_one(pool)
            .await?;

    Ok(EntryStats {
        total_entries: source_types.values().sum(),
        source_types,
        avg_confidence: avg_confidence.unwrap_or(0.0),
    })
}
