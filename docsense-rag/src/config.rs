//! Configuration for the search pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Number of characters kept in a document preview snippet.
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

/// The unit size used for indexing and retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Index individual line fragments; a query answers with the single best line.
    #[default]
    Fragment,
    /// Index whole documents; a query answers with a ranked document list.
    Document,
}

/// Configuration parameters for the search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Retrieval granularity.
    pub granularity: Granularity,
    /// Maximum number of documents returned in document mode. `None` returns all.
    ///
    /// Fragment mode always answers with the single best fragment.
    pub top_k: Option<usize>,
    /// Minimum similarity score for results. `None` keeps every result.
    pub similarity_threshold: Option<f32>,
    /// Length of the preview snippet attached to document-mode results, in characters.
    pub preview_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Fragment,
            top_k: None,
            similarity_threshold: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl SearchConfig {
    /// Create a new builder for constructing a [`SearchConfig`].
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Set the retrieval granularity.
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.config.granularity = granularity;
        self
    }

    /// Limit document-mode results to the `k` best documents.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = Some(k);
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = Some(threshold);
        self
    }

    /// Set the preview snippet length in characters.
    pub fn preview_chars(mut self, chars: usize) -> Self {
        self.config.preview_chars = chars;
        self
    }

    /// Build the [`SearchConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if:
    /// - `top_k == 0`
    /// - `preview_chars == 0`
    /// - the similarity threshold is not within `[-1, 1]`
    pub fn build(self) -> Result<SearchConfig> {
        if self.config.top_k == Some(0) {
            return Err(SearchError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.preview_chars == 0 {
            return Err(SearchError::Config("preview_chars must be greater than zero".to_string()));
        }
        if let Some(threshold) = self.config.similarity_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(SearchError::Config(format!(
                    "similarity_threshold ({threshold}) must be within [-1, 1]"
                )));
            }
        }
        Ok(self.config)
    }
}
