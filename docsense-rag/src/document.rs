//! Data types for uploaded files, fragments, and search results.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TXT_MIME: &str = "text/plain";

/// The document format an upload claims to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    Pdf,
    Docx,
    Txt,
    #[default]
    Unknown,
}

impl DeclaredType {
    /// Map a MIME type to a declared type. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Self::Pdf
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Self::Docx
        } else if essence.eq_ignore_ascii_case(TXT_MIME) {
            Self::Txt
        } else {
            Self::Unknown
        }
    }

    /// Map a file name's extension to a declared type.
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename).extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" => Self::Txt,
            _ => Self::Unknown,
        }
    }

    /// Detect the declared type, preferring the MIME type and falling back to the extension.
    pub fn detect(filename: &str, mime: Option<&str>) -> Self {
        match mime.map(Self::from_mime) {
            Some(declared) if declared != Self::Unknown => declared,
            _ => Self::from_filename(filename),
        }
    }

    /// The canonical MIME type, if the type is known.
    pub fn mime(self) -> Option<&'static str> {
        match self {
            Self::Pdf => Some(PDF_MIME),
            Self::Docx => Some(DOCX_MIME),
            Self::Txt => Some(TXT_MIME),
            Self::Unknown => None,
        }
    }
}

/// An uploaded file: its name, declared format, and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub filename: String,
    pub declared_type: DeclaredType,
    pub content: Vec<u8>,
}

impl FileDescriptor {
    /// Create a descriptor whose type is detected from the file name.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let filename = filename.into();
        let declared_type = DeclaredType::from_filename(&filename);
        Self { filename, declared_type, content: content.into() }
    }

    /// Override the declared type.
    pub fn with_declared_type(mut self, declared_type: DeclaredType) -> Self {
        self.declared_type = declared_type;
        self
    }
}

/// The files submitted together in one ingestion call.
pub type DocumentBatch = [FileDescriptor];

/// A document whose text has already been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Name of the originating upload.
    pub filename: String,
    /// Extracted plain text.
    pub text: String,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self { filename: filename.into(), text: text.into() }
    }
}

/// Per-document metadata attached to document-granularity units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    pub filename: String,
    pub category: Category,
    /// The first few hundred characters of the document.
    pub preview: String,
}

/// A unit of retrieval: a line fragment or a whole document, with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Identifier unique within one index build.
    pub id: String,
    /// The trimmed text of the fragment.
    pub text: String,
    /// Name of the upload this fragment came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,
    /// The vector embedding for this fragment's text. Empty until ingestion embeds it.
    pub embedding: Vec<f32>,
    /// Document metadata, present only for document-granularity units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<DocumentProfile>,
}

/// A retrieved [`Fragment`] paired with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub fragment: Fragment,
    /// Cosine similarity in `[-1, 1]` (higher is more relevant).
    pub score: f32,
}

/// One entry of a document-mode result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatch {
    pub filename: String,
    pub category: Category,
    pub score: f32,
    pub snippet: String,
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_type_from_mime_then_extension() {
        assert_eq!(DeclaredType::detect("a.bin", Some("application/pdf")), DeclaredType::Pdf);
        assert_eq!(DeclaredType::detect("notes.TXT", None), DeclaredType::Txt);
        assert_eq!(
            DeclaredType::detect("report.docx", Some("application/octet-stream")),
            DeclaredType::Docx
        );
        assert_eq!(DeclaredType::detect("slides.pptx", None), DeclaredType::Unknown);
        assert_eq!(DeclaredType::from_mime("text/plain; charset=utf-8"), DeclaredType::Txt);
    }

    #[test]
    fn file_descriptor_detects_type_from_name() {
        let file = FileDescriptor::new("guide.pdf", b"%PDF".to_vec());
        assert_eq!(file.declared_type, DeclaredType::Pdf);
        let file = file.with_declared_type(DeclaredType::Txt);
        assert_eq!(file.declared_type, DeclaredType::Txt);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 300), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("exact", 5), "exact");
    }
}
