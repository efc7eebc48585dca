//! Error types for the `docsense-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying a similarity index.
#[derive(Debug, Error)]
pub enum SearchError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Two vectors that must share a dimensionality do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The dimensionality established by the index.
        expected: usize,
        /// The dimensionality of the offending vector.
        actual: usize,
    },

    /// A vector is empty or contains non-finite components.
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in the ingest/query orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// Why a single document could not be turned into text.
///
/// Extraction failures never abort an ingest; the pipeline skips the document
/// and reports the failure in its [`IngestReport`](crate::IngestReport).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// The declared file type has no extractor.
    #[error("unsupported file type: {filename}")]
    Unsupported {
        /// Name of the rejected file.
        filename: String,
    },

    /// The file could not be parsed (truncated archive, broken PDF, ...).
    #[error("corrupt document {filename}: {reason}")]
    Corrupt {
        /// Name of the rejected file.
        filename: String,
        /// Parser error message.
        reason: String,
    },

    /// The file's text is not valid in the expected encoding.
    #[error("unreadable text in {filename}: {reason}")]
    Encoding {
        /// Name of the rejected file.
        filename: String,
        /// Decoder error message.
        reason: String,
    },
}

/// A convenience result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_display() {
        let err = SearchError::DimensionMismatch { expected: 384, actual: 768 };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 384, got 768");
    }

    #[test]
    fn embedding_error_display_names_provider() {
        let err = SearchError::Embedding {
            provider: "Hash".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Embedding error (Hash): boom");
    }

    #[test]
    fn extraction_failure_display() {
        let err = ExtractionFailure::Unsupported { filename: "notes.odt".to_string() };
        assert_eq!(err.to_string(), "unsupported file type: notes.odt");

        let err = ExtractionFailure::Corrupt {
            filename: "scan.pdf".to_string(),
            reason: "missing xref".to_string(),
        };
        assert!(err.to_string().contains("missing xref"));
    }
}
