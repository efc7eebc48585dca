//! # docsense-rag
//!
//! Fragment indexing and nearest-neighbor retrieval for Docsense.
//!
//! Uploaded documents are split into line fragments (or kept whole), embedded
//! into a vector space, and held in an in-memory [`SimilarityIndex`]. Queries
//! are embedded the same way and resolved to the most similar fragment(s)
//! under cosine similarity.
//!
//! ```text
//! FileDescriptor → DocumentExtractor → normalize → EmbeddingProvider → SimilarityIndex
//!                                                                           ↓
//!                                          query → EmbeddingProvider → search → Answer
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SearchPipeline`] | Orchestrates ingestion and queries |
//! | [`Session`] | Caller-owned index and chat history |
//! | [`SimilarityIndex`] | Brute-force cosine index over [`Fragment`]s |
//! | [`EmbeddingProvider`] | Text to vector |
//! | [`DocumentExtractor`] | File to text |
//! | [`Answer`] | Result of a query, including sentinel outcomes |
//!
//! ## Feature Flags
//!
//! - `fastembed`: [`local::FastEmbedProvider`], a local sentence-embedding model
//! - `remote`: [`remote::HttpEmbeddingProvider`], an OpenAI-compatible HTTP endpoint

pub mod answer;
pub mod category;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod hash;
pub mod index;
pub mod normalizer;
pub mod pipeline;
pub mod session;

#[cfg(feature = "fastembed")]
pub mod local;
#[cfg(feature = "remote")]
pub mod remote;

pub use answer::Answer;
pub use category::{Category, categorize};
pub use config::{Granularity, SearchConfig, SearchConfigBuilder};
pub use document::{
    DeclaredType, DocumentBatch, DocumentMatch, DocumentProfile, FileDescriptor, Fragment,
    SearchHit, SourceDocument,
};
pub use embedding::EmbeddingProvider;
pub use error::{ExtractionFailure, Result, SearchError};
pub use extractor::{DocumentExtractor, PlainTextExtractor};
pub use hash::HashEmbeddingProvider;
pub use index::{SimilarityIndex, cosine_similarity};
pub use normalizer::{
    DocumentSegmenter, LineSegmenter, MIN_FRAGMENT_CHARS, Segmenter, normalize,
};
pub use pipeline::{IngestReport, SearchPipeline, SearchPipelineBuilder, SkippedDocument};
pub use session::{ChatHistory, Interaction, Session};
