//! Error types for loading files from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading upload candidates from the filesystem.
///
/// Parsing problems are not load errors; they surface later as
/// [`ExtractionFailure`](docsense_rag::ExtractionFailure)s during ingestion.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be traversed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A path has no usable file name.
    #[error("path has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}
