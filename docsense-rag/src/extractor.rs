//! Extraction collaborator interface.

use crate::document::{DeclaredType, FileDescriptor};
use crate::error::ExtractionFailure;

/// Turns an uploaded file into plain text.
///
/// Implementations must not panic on malformed input; every problem is
/// reported as an [`ExtractionFailure`], which the pipeline converts into a
/// skipped document.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the plain text of `file`.
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure>;
}

impl<F> DocumentExtractor for F
where
    F: Fn(&FileDescriptor) -> Result<String, ExtractionFailure> + Send + Sync,
{
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure> {
        self(file)
    }
}

/// Decodes `.txt` uploads as strict UTF-8 and rejects every other type.
///
/// A leading byte-order mark is dropped. This is the pipeline's default
/// extractor; richer formats live in `docsense-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure> {
        if file.declared_type != DeclaredType::Txt {
            return Err(ExtractionFailure::Unsupported { filename: file.filename.clone() });
        }
        decode_utf8(&file.filename, &file.content)
    }
}

/// Decode bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode_utf8(filename: &str, bytes: &[u8]) -> Result<String, ExtractionFailure> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionFailure::Encoding {
        filename: filename.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_text_and_strips_bom() {
        let file = FileDescriptor::new("notes.txt", b"\xEF\xBB\xBFhello".to_vec());
        assert_eq!(PlainTextExtractor.extract(&file).unwrap(), "hello");
    }

    #[test]
    fn invalid_utf8_is_an_encoding_failure() {
        let file = FileDescriptor::new("latin1.txt", vec![0x66, 0x6f, 0xf6]);
        let err = PlainTextExtractor.extract(&file).unwrap_err();
        assert!(matches!(err, ExtractionFailure::Encoding { .. }));
    }

    #[test]
    fn other_types_are_unsupported() {
        let file = FileDescriptor::new("manual.pdf", b"%PDF-1.7".to_vec());
        let err = PlainTextExtractor.extract(&file).unwrap_err();
        assert_eq!(err, ExtractionFailure::Unsupported { filename: "manual.pdf".into() });
    }

    #[test]
    fn closures_are_extractors() {
        let extractor =
            |file: &FileDescriptor| Ok::<_, ExtractionFailure>(file.filename.to_uppercase());
        let file = FileDescriptor::new("a.bin", Vec::new());
        assert_eq!(extractor.extract(&file).unwrap(), "A.BIN");
    }
}
