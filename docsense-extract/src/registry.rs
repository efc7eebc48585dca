//! Extractor registry keyed by declared file type.

use std::collections::HashMap;
use std::sync::Arc;

use docsense_rag::{
    DeclaredType, DocumentExtractor, ExtractionFailure, FileDescriptor, PlainTextExtractor,
};
use tracing::debug;

use crate::docx::DocxExtractor;
use crate::pdf::PdfExtractor;

/// Dispatches each file to the extractor registered for its [`DeclaredType`].
///
/// [`FileExtractor::default()`] registers the PDF, DOCX and plain-text
/// extractors. Files whose type has no registered extractor fail with
/// [`ExtractionFailure::Unsupported`].
pub struct FileExtractor {
    extractors: HashMap<DeclaredType, Arc<dyn DocumentExtractor>>,
}

impl FileExtractor {
    /// Create a registry with no extractors.
    #[must_use]
    pub fn new() -> Self {
        Self { extractors: HashMap::new() }
    }

    /// Register `extractor` for `declared_type`, replacing any previous one.
    pub fn register<E>(&mut self, declared_type: DeclaredType, extractor: E)
    where
        E: DocumentExtractor + 'static,
    {
        self.extractors.insert(declared_type, Arc::new(extractor));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<E>(mut self, declared_type: DeclaredType, extractor: E) -> Self
    where
        E: DocumentExtractor + 'static,
    {
        self.register(declared_type, extractor);
        self
    }

    /// The extractor registered for `declared_type`, if any.
    #[must_use]
    pub fn get(&self, declared_type: DeclaredType) -> Option<Arc<dyn DocumentExtractor>> {
        self.extractors.get(&declared_type).cloned()
    }

    /// Whether files of `declared_type` can be extracted.
    #[must_use]
    pub fn supports(&self, declared_type: DeclaredType) -> bool {
        self.extractors.contains_key(&declared_type)
    }
}

impl Default for FileExtractor {
    fn default() -> Self {
        Self::new()
            .with(DeclaredType::Pdf, PdfExtractor)
            .with(DeclaredType::Docx, DocxExtractor)
            .with(DeclaredType::Txt, PlainTextExtractor)
    }
}

impl DocumentExtractor for FileExtractor {
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure> {
        let extractor = self
            .extractors
            .get(&file.declared_type)
            .ok_or_else(|| ExtractionFailure::Unsupported { filename: file.filename.clone() })?;

        debug!(
            document = %file.filename,
            declared_type = ?file.declared_type,
            bytes = file.content.len(),
            "extracting"
        );
        extractor.extract(file)
    }
}
