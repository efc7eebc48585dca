//! Deterministic feature-hashing embedder.
//!
//! [`HashEmbeddingProvider`] needs no model files or network access, which
//! makes it the default for tests and offline use. Texts that share words get
//! similar vectors; it has no notion of synonyms.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};

/// Default dimensionality, matching common small sentence-embedding models.
pub const DEFAULT_HASH_DIMENSIONS: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bag-of-words embedder that hashes lowercased alphanumeric tokens into buckets.
///
/// Each token adds `±1` to one bucket (bucket and sign both come from the
/// token's FNV-1a hash). The result is L2-normalized; text without any token
/// embeds to the zero vector.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Create a provider producing vectors of `dimensions` components.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `dimensions == 0`.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(SearchError::Config("hash embedder needs at least one dimension".into()));
        }
        Ok(Self { dimensions })
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let hash = fnv1a(&token.to_lowercase());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: DEFAULT_HASH_DIMENSIONS }
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET, |acc, b| (acc ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "Hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::cosine_similarity;

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalized() {
        let provider = HashEmbeddingProvider::default();
        let a = provider.embed("Reset the GNSS receiver").await.unwrap();
        let b = provider.embed("Reset the GNSS receiver").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_HASH_DIMENSIONS);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn tokenization_ignores_case_and_punctuation() {
        let provider = HashEmbeddingProvider::default();
        let a = provider.embed("Battery, LOW!").await.unwrap();
        let b = provider.embed("battery low").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn shared_words_score_higher_than_unrelated_text() {
        let provider = HashEmbeddingProvider::default();
        let query = provider.embed("how to calibrate the total station").await.unwrap();
        let close = provider.embed("calibrate the total station before use").await.unwrap();
        let far = provider.embed("quarterly budget spreadsheet").await.unwrap();
        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_output() {
        let provider = HashEmbeddingProvider::new(8).unwrap();
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn text_without_tokens_is_zero_vector() {
        let provider = HashEmbeddingProvider::new(8).unwrap();
        let v = provider.embed("  ...  ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(HashEmbeddingProvider::new(0).is_err());
    }
}
