//! Interaction log persistence

use rqa_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One answered query, as reported by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub query: String,
    pub answer: String,
    pub source: String,
    pub confidence: f64,
    /// Caller-supplied; stored verbatim
    pub timestamp: String,
    pub processing_time_ms: i64,
}

pub async fn insert_interaction(pool: &SqlitePool, record: &InteractionRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO interactions (
            id, query, answer, source, confidence, timestamp, processing_time_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.query)
    .bind(&record.answer)
    .bind(&record.source)
    .bind(record.confidence)
    .bind(&record.timestamp)
    .bind(record.processing_time_ms)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn count_interactions(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM interactions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Aggregate view of the interaction log
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InteractionStats {
    pub total_queries: i64,
    pub sources_used: BTreeMap<String, i64>,
    pub avg_confidence: f64,
}

pub async fn interaction_stats(pool: &SqlitePool) -> Result<InteractionStats> {
    let rows = sqlx::query("SELECT source, COUNT(*) AS n FROM interactions GROUP BY source")
        .fetch_all(pool)
        .await?;
    let sources_used: BTreeMap<String, i64> = rows
        .iter()
        .map(|row| (row.get("source"), row.get("n")))
        .collect();

    let avg_confidence: Option<f64> = sqlx::query_scalar("SELECT AVG(confidence) FROM interactions")
        .fetch_one(pool)
        .await?;

    Ok(InteractionStats {
        total_queries: sources_used.values().sum(),
        sources_used,
        avg_confidence: avg_confidence.unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    fn record(source: &str, confidence: f64) -> InteractionRecord {
        InteractionRecord {
            id: Uuid::new_v4(),
            query: "q".into(),
            answer: "a".into(),
            source: source.into(),
            confidence,
            timestamp: "2024-01-01T00:00:00Z".into(),
            processing_time_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_log_and_aggregate() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();

        insert_interaction(&pool, &record("manual_knowledge", 0.9)).await.unwrap();
        insert_interaction(&pool, &record("manual_knowledge", 0.7)).await.unwrap();
        insert_interaction(&pool, &record("fallback", 0.2)).await.unwrap();

        assert_eq!(count_interactions(&pool).await.unwrap(), 3);

        let stats = interaction_stats(&pool).await.unwrap();
        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.sources_used["manual_knowledge"], 2);
        assert_eq!(stats.sources_used["fallback"], 1);
        assert!((stats.avg_confidence - 0.6).abs() < 1e-9);
    }
}
