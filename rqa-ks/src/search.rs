//! Similarity search over stored entries
//!
//! Brute-force scan: every stored embedding is compared with the question's
//! embedding and the best of the top candidates is reported.
//!
//! # Confidence
//! confidence = (similarity + stored confidence) / 2, and a match is
//! only "found" above [`CONFIDENCE_FLOOR`].

use rqa_common::api::KnowledgeMatch;
use rqa_common::Result;
use serde_json::{json, Map};
use sqlx::SqlitePool;
use std::cmp::Ordering;
use tracing::debug;

use crate::db::entries::{load_entries, KnowledgeEntry};
use crate::embedding::{similarity, HashingEncoder};
use crate::topics::lookup_topic;

/// Candidates considered per search
pub const TOP_K: usize = 5;

/// Matches at or below this confidence are reported as not found
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// Confidence reported when neither the dictionary nor the index matched
pub const NO_MATCH_CONFIDENCE: f64 = -0.1;

/// A scored candidate
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: KnowledgeEntry,
    pub similarity: f64,
}

/// Top `limit` entries by similarity to `question`, best first
pub async fn nearest_entries(
    pool: &SqlitePool,
    encoder: &HashingEncoder,
    question: &str,
    limit: usize,
) -> Result<Vec<ScoredEntry>> {
    let query = encoder.encode(question);

    let mut scored: Vec<ScoredEntry> = load_entries(pool)
        .await?
        .into_iter()
        .map(|entry| ScoredEntry {
            similarity: similarity(&query, &entry.embedding),
            entry,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);
    Ok(scored)
}

/// Vector search (`POST /manual_search`)
pub async fn vector_search(
    pool: &SqlitePool,
    encoder: &HashingEncoder,
    question: &str,
) -> Result<KnowledgeMatch> {
    let candidates = nearest_entries(pool, encoder, question, TOP_K).await?;

    let Some(best) = candidates.into_iter().next() else {
        return Ok(KnowledgeMatch {
            source_type: "none".to_string(),
            ..KnowledgeMatch::default()
        });
    };

    let stored_confidence = best.entry.confidence_score;
    let confidence = (best.similarity + stored_confidence) / 2.0;
    debug!(
        similarity = best.similarity,
        stored_confidence, confidence, "Best vector match"
    );

    if confidence <= CONFIDENCE_FLOOR {
        return Ok(KnowledgeMatch::not_found(
            "low_confidence",
            confidence,
            "Low confidence match",
        ));
    }

    let mut metadata = Map::new();
    metadata.insert("id".to_string(), json!(best.entry.id));
    metadata.insert("brand".to_string(), json!(best.entry.brand));
    metadata.insert("product_category".to_string(), json!(best.entry.product_category));
    metadata.insert("timestamp".to_string(), json!(best.entry.timestamp));
    metadata.insert("similarity_score".to_string(), json!(best.similarity));
    metadata.insert("stored_confidence".to_string(), json!(stored_confidence));

    Ok(KnowledgeMatch {
        found: true,
        answer: best.entry.answer,
        confidence,
        source_type: best.entry.source_type,
        metadata,
    })
}

/// Dictionary first, then the vector index (`GET /manual_search_get`)
pub async fn topic_then_vector_search(
    pool: &SqlitePool,
    encoder: &HashingEncoder,
    question: &str,
) -> Result<KnowledgeMatch> {
    if let Some(topic) = lookup_topic(question) {
        debug!(topic = topic.id, "Dictionary match");
        return Ok(topic.to_match());
    }

    let result = vector_search(pool, encoder, question).await?;
    if result.found {
        return Ok(result);
    }

    Ok(KnowledgeMatch::not_found(
        "low_confidence",
        NO_MATCH_CONFIDENCE,
        "No matching information found for this question",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::insert_entry;
    use crate::db::{create_schema, init_memory_database};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn empty_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_empty_table() {
        let pool = empty_pool().await;
        let result = vector_search(&pool, &HashingEncoder::default(), "anything")
            .await
            .unwrap();
        assert!(!result.found);
        assert_eq!(result.source_type, "none");
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_confidence_averages_similarity_and_stored() {
        let pool = empty_pool().await;
        let encoder = HashingEncoder::default();
        let mut entry = KnowledgeEntry::new("Do you ship abroad?".into(), "Yes.".into(), &encoder);
        entry.confidence_score = 0.9;
        insert_entry(&pool, &entry).await.unwrap();

        let result = vector_search(&pool, &encoder, "Do you ship abroad?").await.unwrap();
        let similarity = result.metadata["similarity_score"].as_f64().unwrap();
        assert!(result.found);
        assert!((result.confidence - (similarity + 0.9) / 2.0).abs() < 1e-9);
        assert_eq!(result.answer, "Yes.");
    }

    #[tokio::test]
    async fn test_low_confidence_not_found() {
        let pool = empty_pool().await;
        let encoder = HashingEncoder::default();
        let mut entry = KnowledgeEntry::new("alpha".into(), "beta".into(), &encoder);
        entry.confidence_score = 0.0;
        insert_entry(&pool, &entry).await.unwrap();

        // No shared tokens: similarity near 1 - sqrt(2)
        let result = vector_search(&pool, &encoder, "gamma delta").await.unwrap();
        assert!(!result.found);
        assert_eq!(result.source_type, "low_confidence");
        assert!(result.confidence <= CONFIDENCE_FLOOR);
        assert_eq!(result.metadata["reason"], "Low confidence match");
    }

    #[tokio::test]
    async fn test_top_k_best_first() {
        let pool = empty_pool().await;
        let encoder = HashingEncoder::default();
        for i in 0..8 {
            let entry = KnowledgeEntry::new(format!("question {}", i), "answer".into(), &encoder);
            insert_entry(&pool, &entry).await.unwrap();
        }

        let results = nearest_entries(&pool, &encoder, "question 3", TOP_K).await.unwrap();
        assert_eq!(results.len(), TOP_K);
        assert_eq!(results[0].entry.question, "question 3");
        assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[tokio::test]
    async fn test_dictionary_first() {
        let encoder = HashingEncoder::default();
        let pool = init_memory_database(&encoder).await.unwrap();

        let result = topic_then_vector_search(&pool, &encoder, "How long does shipping take?")
            .await
            .unwrap();
        assert_eq!(result.confidence, 0.90);
        assert_eq!(result.metadata["id"], "shipping-info-1");
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let pool = empty_pool().await;
        let result = topic_then_vector_search(&pool, &HashingEncoder::default(), "gift cards?")
            .await
            .unwrap();
        assert!(!result.found);
        assert_eq!(result.confidence, NO_MATCH_CONFIDENCE);
        assert_eq!(result.source_type, "low_confidence");
    }
}
