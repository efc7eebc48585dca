//! PDF text extractor.

use std::panic::{AssertUnwindSafe, catch_unwind};

use docsense_rag::{DocumentExtractor, ExtractionFailure, FileDescriptor};
use tracing::{debug, warn};

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Scanned PDFs without a text layer yield empty text, which the pipeline
/// skips. Parser panics on malformed input are caught and reported as
/// [`ExtractionFailure::Corrupt`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure> {
        let corrupt =
            |reason: String| ExtractionFailure::Corrupt { filename: file.filename.clone(), reason };

        let outcome =
            catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&file.content)));
        let text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(corrupt(e.to_string())),
            Err(_) => {
                warn!(document = %file.filename, "pdf parser panicked");
                return Err(corrupt("pdf parser panicked".to_string()));
            }
        };

        debug!(document = %file.filename, chars = text.len(), "extracted pdf text");
        Ok(text)
    }
}
