//! # docsense-extract
//!
//! Turns uploaded PDF, DOCX and plain-text files into the raw text consumed by
//! [`docsense_rag::SearchPipeline`], and loads those files from disk.
//!
//! [`FileExtractor`] dispatches on a file's [`DeclaredType`](docsense_rag::DeclaredType)
//! and implements the core [`DocumentExtractor`](docsense_rag::DocumentExtractor)
//! trait, so it plugs straight into the pipeline builder:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docsense_extract::{FileExtractor, load_batch};
//!
//! let pipeline = SearchPipeline::builder()
//!     .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!     .extractor(Arc::new(FileExtractor::default()))
//!     .build()?;
//!
//! let files = load_batch(&["manual.pdf", "notes.docx"]).await?;
//! pipeline.ingest(&mut session, &files).await?;
//! ```

pub mod docx;
pub mod error;
pub mod load;
pub mod pdf;
pub mod registry;

pub use docx::DocxExtractor;
pub use error::LoadError;
pub use load::{collect_files, load_batch, load_file};
pub use pdf::PdfExtractor;
pub use registry::FileExtractor;
