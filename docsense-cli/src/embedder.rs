//! Embedding provider selection from command-line flags.

use std::sync::Arc;

use anyhow::Result;
use docsense_rag::hash::DEFAULT_HASH_DIMENSIONS;
use docsense_rag::{EmbeddingProvider, HashEmbeddingProvider};

use crate::cli::{EmbedderArgs, EmbedderKind};

/// Model requested from remote endpoints when `--model` is not given.
pub const DEFAULT_REMOTE_MODEL: &str = "text-embedding-3-small";

/// Dimensions of [`DEFAULT_REMOTE_MODEL`].
pub const DEFAULT_REMOTE_DIMENSIONS: usize = 1536;

/// Build the provider selected by `args`.
///
/// # Errors
///
/// Fails if the provider cannot be constructed or was not compiled in.
pub async fn build_provider(args: &EmbedderArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    match args.embedder {
        EmbedderKind::Hash => {
            let dimensions = args.dimensions.unwrap_or(DEFAULT_HASH_DIMENSIONS);
            Ok(Arc::new(HashEmbeddingProvider::new(dimensions)?))
        }
        EmbedderKind::Fastembed => fastembed_provider(args).await,
        EmbedderKind::Remote => remote_provider(args),
    }
}

#[cfg(feature = "fastembed")]
async fn fastembed_provider(args: &EmbedderArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    use anyhow::Context;
    use docsense_rag::local::FastEmbedProvider;

    if args.dimensions.is_some() {
        tracing::warn!("--dimensions is ignored by the fastembed embedder");
    }
    let provider = tokio::task::spawn_blocking(FastEmbedProvider::new)
        .await
        .context("model loading task failed")??;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "fastembed"))]
async fn fastembed_provider(_args: &EmbedderArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    anyhow::bail!("the fastembed embedder is not available; rebuild with `--features fastembed`")
}

#[cfg(feature = "remote")]
fn remote_provider(args: &EmbedderArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    use docsense_rag::remote::{DEFAULT_BASE_URL, HttpEmbeddingProvider};

    let base_url = args.embeddings_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let model = args.model.as_deref().unwrap_or(DEFAULT_REMOTE_MODEL);
    let dimensions = args.dimensions.unwrap_or(DEFAULT_REMOTE_DIMENSIONS);

    let mut provider = HttpEmbeddingProvider::new(base_url, model, dimensions)?;
    if let Some(api_key) = &args.api_key {
        provider = provider.with_api_key(api_key.clone());
    }
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "remote"))]
fn remote_provider(_args: &EmbedderArgs) -> Result<Arc<dyn EmbeddingProvider>> {
    anyhow::bail!("the remote embedder is not available; rebuild with `--features remote`")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(embedder: EmbedderKind, dimensions: Option<usize>) -> EmbedderArgs {
        EmbedderArgs { embedder, dimensions, embeddings_url: None, model: None, api_key: None }
    }

    #[tokio::test]
    async fn hash_embedder_uses_requested_dimensions() {
        let provider = build_provider(&args(EmbedderKind::Hash, Some(32))).await.unwrap();
        assert_eq!(provider.dimensions(), 32);
        assert_eq!(provider.name(), "Hash");
    }

    #[tokio::test]
    async fn hash_embedder_defaults_dimensions() {
        let provider = build_provider(&args(EmbedderKind::Hash, None)).await.unwrap();
        assert_eq!(provider.dimensions(), DEFAULT_HASH_DIMENSIONS);
    }

    #[tokio::test]
    async fn zero_dimensions_are_rejected() {
        assert!(build_provider(&args(EmbedderKind::Hash, Some(0))).await.is_err());
    }

    #[cfg(not(feature = "remote"))]
    #[tokio::test]
    async fn remote_requires_feature() {
        let err = build_provider(&args(EmbedderKind::Remote, None)).await.err().unwrap();
        assert!(err.to_string().contains("--features remote"));
    }
}
