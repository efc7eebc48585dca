//! HTTP embedding provider for OpenAI-compatible `/embeddings` endpoints.
//!
//! This module is only available when the `remote` feature is enabled. It
//! works with hosted APIs as well as local servers that expose the same
//! request shape (text-embeddings-inference, Ollama, LM Studio, ...).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SearchError};

const PROVIDER: &str = "Http";

/// The default endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// An [`EmbeddingProvider`] that posts texts to `{base_url}/embeddings`.
///
/// The caller states the expected dimensionality up front; responses with a
/// different vector length or count are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use docsense_rag::remote::HttpEmbeddingProvider;
///
/// let provider = HttpEmbeddingProvider::new("http://localhost:8080/v1", "all-minilm", 384)?
///     .with_api_key(std::env::var("DOCSENSE_API_KEY")?);
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl HttpEmbeddingProvider {
    /// Create a provider for `model` served under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the URL or model is empty or
    /// `dimensions == 0`.
    pub fn new(base_url: &str, model: impl Into<String>, dimensions: usize) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let model = model.into();
        if base_url.is_empty() {
            return Err(SearchError::Config("embedding endpoint URL must not be empty".into()));
        }
        if model.is_empty() {
            return Err(SearchError::Config("embedding model name must not be empty".into()));
        }
        if dimensions == 0 {
            return Err(SearchError::Config(
                "embedding dimensions must be greater than zero".into(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{base_url}/embeddings"),
            model,
            api_key: None,
            dimensions,
        })
    }

    /// Send `Authorization: Bearer <key>` with each request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    /// The full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn embedding_error(message: String) -> SearchError {
    SearchError::Embedding { provider: PROVIDER.into(), message }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Order response vectors by their `index` field (falling back to response
/// order) and check count and dimensionality.
///
/// When indices are present they must cover `0..expected_count` exactly once.
fn collect_embeddings(
    mut data: Vec<EmbeddingData>,
    expected_count: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected_count {
        return Err(embedding_error(format!(
            "endpoint returned {} embeddings for {expected_count} inputs",
            data.len()
        )));
    }
    if data.iter().any(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
        if let Some((position, d)) =
            data.iter().enumerate().find(|(position, d)| d.index != Some(*position))
        {
            return Err(embedding_error(match d.index {
                Some(index) => format!(
                    "endpoint returned embedding index {index} at position {position} \
                     for {expected_count} inputs"
                ),
                None => "endpoint returned embeddings with and without an index".to_string(),
            }));
        }
    }
    data.into_iter()
        .map(|d| {
            if d.embedding.len() == dimensions {
                Ok(d.embedding)
            } else {
                Err(SearchError::DimensionMismatch {
                    expected: dimensions,
                    actual: d.embedding.len(),
                })
            }
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| embedding_error("endpoint returned no embedding".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let body = EmbeddingRequest { model: &self.model, input: texts };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            embedding_error(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = PROVIDER, %status, "endpoint error");
            return Err(embedding_error(format!("endpoint returned {status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        collect_embeddings(parsed.data, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_from_base_url() {
        let provider =
            HttpEmbeddingProvider::new("http://localhost:8080/v1/", "minilm", 384).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn rejects_invalid_settings() {
        assert!(HttpEmbeddingProvider::new("", "m", 3).is_err());
        assert!(HttpEmbeddingProvider::new(DEFAULT_BASE_URL, "", 3).is_err());
        assert!(HttpEmbeddingProvider::new(DEFAULT_BASE_URL, "m", 0).is_err());
    }

    #[test]
    fn orders_vectors_by_index() {
        let data: Vec<EmbeddingData> = serde_json::from_str(
            r#"[{"index": 1, "embedding": [0.0, 1.0]}, {"index": 0, "embedding": [1.0, 0.0]}]"#,
        )
        .unwrap();
        let vectors = collect_embeddings(data, 2, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn rejects_wrong_count_and_dimensions() {
        let data: Vec<EmbeddingData> =
            serde_json::from_str(r#"[{"embedding": [1.0, 0.0, 0.0]}]"#).unwrap();
        let err = collect_embeddings(data, 1, 2).unwrap_err();
        assert!(matches!(err, SearchError::DimensionMismatch { expected: 2, actual: 3 }));

        let data: Vec<EmbeddingData> = serde_json::from_str(r#"[{"embedding": [1.0]}]"#).unwrap();
        assert!(collect_embeddings(data, 2, 1).is_err());
    }

    #[test]
    fn rejects_duplicate_or_out_of_range_indices() {
        let duplicate: Vec<EmbeddingData> = serde_json::from_str(
            r#"[{"index": 0, "embedding": [1.0, 0.0]}, {"index": 0, "embedding": [0.0, 1.0]}]"#,
        )
        .unwrap();
        let err = collect_embeddings(duplicate, 2, 2).unwrap_err();
        assert!(matches!(err, SearchError::Embedding { .. }));

        let out_of_range: Vec<EmbeddingData> = serde_json::from_str(
            r#"[{"index": 0, "embedding": [1.0, 0.0]}, {"index": 5, "embedding": [0.0, 1.0]}]"#,
        )
        .unwrap();
        assert!(collect_embeddings(out_of_range, 2, 2).is_err());

        let partial: Vec<EmbeddingData> = serde_json::from_str(
            r#"[{"index": 1, "embedding": [1.0, 0.0]}, {"embedding": [0.0, 1.0]}]"#,
        )
        .unwrap();
        assert!(collect_embeddings(partial, 2, 2).is_err());
    }
}
