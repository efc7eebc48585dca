//! Retrieval orchestrator.
//!
//! The [`SearchPipeline`] coordinates the ingest-and-query workflow by
//! composing a [`DocumentExtractor`], the text normalizer, an
//! [`EmbeddingProvider`], and the [`SimilarityIndex`] held by a caller-owned
//! [`Session`].
//!
//! # Example
//!
//! ```rust,ignore
//! use docsense_rag::{HashEmbeddingProvider, SearchConfig, SearchPipeline, Session};
//!
//! let pipeline = SearchPipeline::builder()
//!     .config(SearchConfig::default())
//!     .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!     .build()?;
//!
//! let mut session = Session::new();
//! pipeline.ingest(&mut session, &files).await?;
//! let answer = pipeline.ask(&mut session, "why does the receiver lose fix?").await?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::answer::Answer;
use crate::config::{Granularity, SearchConfig};
use crate::document::{
    DocumentBatch, DocumentMatch, FileDescriptor, Fragment, SearchHit, SourceDocument,
};
use crate::embedding::EmbeddingProvider;
use crate::error::{ExtractionFailure, Result, SearchError};
use crate::extractor::{DocumentExtractor, PlainTextExtractor};
use crate::index::SimilarityIndex;
use crate::normalizer::segmenter_for;
use crate::session::Session;

/// A document left out of an ingestion, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

/// Summary of one ingestion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Documents that produced text.
    pub documents: usize,
    /// Units (fragments or whole documents) now in the index.
    pub fragments: usize,
    /// Documents that failed extraction or had no text, in batch order.
    pub skipped: Vec<SkippedDocument>,
}

/// The retrieval orchestrator.
///
/// The pipeline itself is stateless; the index and chat history live in the
/// [`Session`] passed to each call. Construct one via
/// [`SearchPipeline::builder()`].
pub struct SearchPipeline {
    config: SearchConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    extractor: Arc<dyn DocumentExtractor>,
}

impl SearchPipeline {
    /// Create a new [`SearchPipelineBuilder`].
    pub fn builder() -> SearchPipelineBuilder {
        SearchPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Ingest a batch of uploaded files, replacing the session's index.
    ///
    /// Files that fail extraction or contain no text are skipped with a
    /// warning and listed in the returned [`IngestReport`]. Extraction runs on
    /// the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding fails or the embeddings are inconsistent.
    /// The session keeps its previous index in that case.
    pub async fn ingest(
        &self,
        session: &mut Session,
        batch: &DocumentBatch,
    ) -> Result<IngestReport> {
        let mut outcomes = Vec::with_capacity(batch.len());
        for file in batch {
            match self.extract_off_runtime(file).await {
                Ok(text) => outcomes.push(Ok(SourceDocument::new(file.filename.clone(), text))),
                Err(failure) => {
                    warn!(
                        document = %file.filename,
                        reason = %failure,
                        "skipping document: extraction failed"
                    );
                    outcomes.push(Err(SkippedDocument {
                        filename: file.filename.clone(),
                        reason: failure.to_string(),
                    }));
                }
            }
        }
        self.rebuild(session, outcomes).await
    }

    /// PDF and DOCX parsing is CPU-bound; keep it off the async workers.
    async fn extract_off_runtime(
        &self,
        file: &FileDescriptor,
    ) -> std::result::Result<String, ExtractionFailure> {
        let extractor = Arc::clone(&self.extractor);
        let owned = file.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&owned)).await.unwrap_or_else(|e| {
            error!(document = %file.filename, error = %e, "extraction task failed");
            Err(ExtractionFailure::Corrupt {
                filename: file.filename.clone(),
                reason: format!("extraction task failed: {e}"),
            })
        })
    }

    /// Ingest documents whose text was already extracted, replacing the session's index.
    ///
    /// # Errors
    ///
    /// See [`ingest`](Self::ingest).
    pub async fn ingest_documents(
        &self,
        session: &mut Session,
        documents: Vec<SourceDocument>,
    ) -> Result<IngestReport> {
        self.rebuild(session, documents.into_iter().map(Ok).collect()).await
    }

    async fn rebuild(
        &self,
        session: &mut Session,
        outcomes: Vec<std::result::Result<SourceDocument, SkippedDocument>>,
    ) -> Result<IngestReport> {
        let segmenter = segmenter_for(self.config.granularity, self.config.preview_chars);
        let mut report = IngestReport::default();
        let mut fragments: Vec<Fragment> = Vec::new();

        // 1. Segment surviving documents
        for outcome in outcomes {
            let document = match outcome {
                Ok(document) => document,
                Err(skipped) => {
                    report.skipped.push(skipped);
                    continue;
                }
            };
            if document.text.trim().is_empty() {
                warn!(document = %document.filename, "skipping document: no text extracted");
                report.skipped.push(SkippedDocument {
                    filename: document.filename,
                    reason: "no text extracted".to_string(),
                });
                continue;
            }
            report.documents += 1;
            fragments.extend(segmenter.segment(&document));
        }

        // 2. Embed and build, or fall back to an empty index
        let index = if fragments.is_empty() {
            SimilarityIndex::new()
        } else {
            self.embed_fragments(&mut fragments).await?;
            SimilarityIndex::build(fragments).map_err(|e| {
                error!(error = %e, "index build failed");
                e
            })?
        };

        // 3. Swap in the new index only once it is complete
        report.fragments = index.len();
        session.replace_index(index);

        info!(
            documents = report.documents,
            fragments = report.fragments,
            skipped = report.skipped.len(),
            granularity = ?self.config.granularity,
            "ingested batch"
        );
        Ok(report)
    }

    async fn embed_fragments(&self, fragments: &mut [Fragment]) -> Result<()> {
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(
                provider = self.embedding_provider.name(),
                error = %e,
                "embedding failed during ingestion"
            );
            SearchError::Pipeline(format!("embedding failed during ingestion: {e}"))
        })?;

        if embeddings.len() != fragments.len() {
            error!(
                expected = fragments.len(),
                actual = embeddings.len(),
                "embedding provider returned wrong number of vectors"
            );
            return Err(SearchError::Pipeline(format!(
                "embedding provider returned {} vectors for {} fragments",
                embeddings.len(),
                fragments.len()
            )));
        }

        let expected = self.embedding_provider.dimensions();
        for (fragment, embedding) in fragments.iter_mut().zip(embeddings) {
            if embedding.len() != expected {
                return Err(SearchError::DimensionMismatch { expected, actual: embedding.len() });
            }
            fragment.embedding = embedding;
        }
        Ok(())
    }

    /// Answer a query against the session's index and record it in the chat history.
    ///
    /// Blank queries and empty indices short-circuit to sentinel answers
    /// without calling the embedding provider. Fragment mode answers with the
    /// single best fragment; document mode with every document (or the
    /// configured `top_k`) ranked by score.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded or searched. Failed
    /// queries are not recorded; the index and history are left untouched.
    pub async fn ask(&self, session: &mut Session, query: &str) -> Result<Answer> {
        let answer = if query.trim().is_empty() {
            debug!("empty query");
            Answer::EmptyQuery
        } else if !session.has_documents() {
            debug!("query against empty index");
            Answer::NoDocuments
        } else {
            let k = match self.config.granularity {
                Granularity::Fragment => 1,
                Granularity::Document => self.config.top_k.unwrap_or(session.index().len()),
            };
            let hits = self.search_index(session.index(), query, k).await?;
            self.answer_from_hits(hits)
        };

        session.history_mut().record(query, answer.clone());
        Ok(answer)
    }

    /// Rank the `k` best units for `query` without touching the chat history.
    ///
    /// Blank queries and empty indices return no hits.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded or searched.
    pub async fn search(&self, session: &Session, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() || !session.has_documents() {
            return Ok(Vec::new());
        }
        self.search_index(session.index(), query, k).await
    }

    async fn search_index(
        &self,
        index: &SimilarityIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        // 1. Embed the query
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(
                provider = self.embedding_provider.name(),
                error = %e,
                "embedding failed during query"
            );
            SearchError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        // 2. Search the index
        let hits = index.search(&query_embedding, k).map_err(|e| {
            error!(error = %e, "index search failed");
            e
        })?;

        // 3. Filter by similarity threshold
        let hits: Vec<SearchHit> = match self.config.similarity_threshold {
            Some(threshold) => hits.into_iter().filter(|h| h.score >= threshold).collect(),
            None => hits,
        };

        info!(result_count = hits.len(), k, "query completed");
        Ok(hits)
    }

    fn answer_from_hits(&self, hits: Vec<SearchHit>) -> Answer {
        match self.config.granularity {
            Granularity::Fragment => match hits.into_iter().next() {
                Some(hit) => Answer::Fragment {
                    text: hit.fragment.text,
                    score: hit.score,
                    source_document: hit.fragment.source_document,
                },
                None => Answer::NoMatch,
            },
            Granularity::Document => Answer::Documents {
                matches: hits.into_iter().filter_map(document_match).collect(),
            },
        }
    }
}

fn document_match(hit: SearchHit) -> Option<DocumentMatch> {
    let profile = hit.fragment.profile?;
    Some(DocumentMatch {
        filename: profile.filename,
        category: profile.category,
        score: hit.score,
        snippet: profile.preview,
    })
}

/// Builder for constructing a [`SearchPipeline`].
///
/// Only the embedding provider is required. The configuration defaults to
/// [`SearchConfig::default()`] and the extractor to [`PlainTextExtractor`].
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = SearchPipeline::builder()
///     .config(SearchConfig::builder().granularity(Granularity::Document).build()?)
///     .embedding_provider(Arc::new(embedder))
///     .extractor(Arc::new(FileExtractor::new()))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct SearchPipelineBuilder {
    config: Option<SearchConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    extractor: Option<Arc<dyn DocumentExtractor>>,
}

impl SearchPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the document extractor.
    pub fn extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Build the [`SearchPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if no embedding provider was set or the
    /// provider reports zero dimensions.
    pub fn build(self) -> Result<SearchPipeline> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| SearchError::Config("embedding_provider is required".to_string()))?;
        if embedding_provider.dimensions() == 0 {
            return Err(SearchError::Config(format!(
                "embedding provider '{}' reports zero dimensions",
                embedding_provider.name()
            )));
        }

        Ok(SearchPipeline {
            config: self.config.unwrap_or_default(),
            embedding_provider,
            extractor: self.extractor.unwrap_or_else(|| Arc::new(PlainTextExtractor)),
        })
    }
}
