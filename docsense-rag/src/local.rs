//! Local sentence-embedding provider backed by `fastembed`.
//!
//! This module is only available when the `fastembed` feature is enabled.
//! The model is downloaded on first use and cached by `fastembed`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};

const PROVIDER: &str = "FastEmbed";

/// An [`EmbeddingProvider`] running a local ONNX sentence-embedding model.
///
/// Defaults to `AllMiniLML6V2` (384 dimensions). Inference is blocking, so
/// each call runs on tokio's blocking thread pool.
///
/// # Example
///
/// ```rust,ignore
/// use docsense_rag::local::FastEmbedProvider;
///
/// let provider = FastEmbedProvider::new()?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Load the default `AllMiniLML6V2` model.
    pub fn new() -> Result<Self> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2)
    }

    /// Load a specific `fastembed` model.
    ///
    /// The dimensionality is probed with a test embedding.
    pub fn with_model(model: EmbeddingModel) -> Result<Self> {
        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model.clone()).with_show_download_progress(false),
        )
        .map_err(|e| embedding_error(format!("failed to load model {model:?}: {e}")))?;

        let probe = text_model
            .embed(vec!["dimension probe"], None)
            .map_err(|e| embedding_error(format!("probe embedding failed: {e}")))?;
        let dimensions = probe.first().map(Vec::len).unwrap_or_default();
        debug!(provider = PROVIDER, ?model, dimensions, "loaded embedding model");

        Ok(Self { model: Arc::new(Mutex::new(text_model)), dimensions })
    }
}

fn embedding_error(message: String) -> SearchError {
    SearchError::Embedding { provider: PROVIDER.into(), message }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| embedding_error("model returned no embedding".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(provider = PROVIDER, batch_size = texts.len(), "embedding batch");

        let owned: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || {
            let mut model =
                model.lock().map_err(|_| embedding_error("model lock poisoned".into()))?;
            model.embed(owned, None).map_err(|e| {
                error!(provider = PROVIDER, error = %e, "inference failed");
                embedding_error(format!("inference failed: {e}"))
            })
        })
        .await
        .map_err(|e| embedding_error(format!("embedding task failed: {e}")))?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
