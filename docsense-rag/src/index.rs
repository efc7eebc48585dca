//! In-memory similarity index using cosine similarity.
//!
//! [`SimilarityIndex`] holds the fragments of the current document batch in
//! insertion order and answers nearest-vector queries with a brute-force
//! linear scan. It is rebuilt wholesale on every ingestion.

use std::cmp::Ordering;

use crate::document::{Fragment, SearchHit};
use crate::error::{Result, SearchError};

/// An ordered, immutable set of embedded fragments.
///
/// Either empty, or every fragment's embedding shares one dimensionality.
///
/// # Example
///
/// ```rust,ignore
/// use docsense_rag::SimilarityIndex;
///
/// let index = SimilarityIndex::build(fragments)?;
/// let hits = index.search(&query_embedding, 1)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    fragments: Vec<Fragment>,
    dimensions: Option<usize>,
}

impl SimilarityIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from fragments with embeddings attached.
    ///
    /// The first fragment's embedding fixes the index dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidEmbedding`] if an embedding is empty or has
    /// non-finite components, and [`SearchError::DimensionMismatch`] if the
    /// embeddings disagree on dimensionality.
    pub fn build(fragments: Vec<Fragment>) -> Result<Self> {
        let Some(first) = fragments.first() else {
            return Ok(Self::new());
        };
        let dimensions = first.embedding.len();

        for fragment in &fragments {
            if fragment.embedding.is_empty() {
                return Err(SearchError::InvalidEmbedding(format!(
                    "fragment '{}' has no embedding",
                    fragment.id
                )));
            }
            if fragment.embedding.len() != dimensions {
                return Err(SearchError::DimensionMismatch {
                    expected: dimensions,
                    actual: fragment.embedding.len(),
                });
            }
            if fragment.embedding.iter().any(|x| !x.is_finite()) {
                return Err(SearchError::InvalidEmbedding(format!(
                    "fragment '{}' has non-finite components",
                    fragment.id
                )));
            }
        }

        Ok(Self { fragments, dimensions: Some(dimensions) })
    }

    /// Number of indexed fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the index holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The shared embedding dimensionality, or `None` for an empty index.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// The indexed fragments in insertion order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Return the `k` fragments most similar to `query`, best first.
    ///
    /// Equal scores keep insertion order. An empty index or `k == 0` yields an
    /// empty result.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::DimensionMismatch`] if `query` does not match the
    /// dimensionality of a non-empty index.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let Some(dimensions) = self.dimensions else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != dimensions {
            return Err(SearchError::DimensionMismatch {
                expected: dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .fragments
            .iter()
            .enumerate()
            .map(|(position, fragment)| (position, cosine_similarity(&fragment.embedding, query)))
            .collect();

        // Stable sort: ties stay in insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(position, score)| SearchHit {
                fragment: self.fragments[position].clone(),
                score,
            })
            .collect())
    }

    /// Rank every indexed fragment against `query`.
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search).
    pub fn search_all(&self, query: &[f32]) -> Result<Vec<SearchHit>> {
        self.search(query, self.len())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if the vectors differ in length, either has zero magnitude,
/// or the result is not finite. The result is clamped to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let score = dot / (norm_a * norm_b);
    if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 }
}
