//! Local text embeddings
//!
//! Deterministic feature hashing: lowercased word unigrams and adjacent-word
//! bigrams are hashed with SHA-256 into a fixed number of buckets, counted,
//! and L2-normalized. No model download, identical output on every platform.

use rqa_common::text::words;
use sha2::{Digest, Sha256};

/// Embedding width
pub const EMBEDDING_DIMENSIONS: usize = 384;

/// Reported by `/health`
pub const EMBEDDING_MODEL: &str = "sha256-feature-hashing-384";

/// Bigrams count for less than unigrams
const BIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing text encoder
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimensions: usize,
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIMENSIONS)
    }
}

impl HashingEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, feature: &str) -> usize {
        let digest = Sha256::digest(feature.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % self.dimensions as u64) as usize
    }

    /// Encode `text`; empty input gives the zero vector
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let tokens = words(text);
        let mut vector = vec![0.0f32; self.dimensions];

        for token in &tokens {
            vector[self.bucket(token)] += 1.0;
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            vector[self.bucket(&bigram)] += BIGRAM_WEIGHT;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

/// Euclidean distance; unit vectors are at most 2.0 apart
pub fn l2_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (*x as f64 - *y as f64).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Similarity = 1 - L2 distance, in [-1, 1] for normalized vectors
///
/// Unrelated texts (orthogonal vectors) score about -0.41. Vectors of
/// different width never match and score -1.0.
pub fn similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return -1.0;
    }
    1.0 - l2_distance(a, b)
}

/// Little-endian BLOB encoding for SQLite storage
pub fn to_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn from_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
