//! Text normalization and segmentation into retrieval units.
//!
//! [`normalize`] turns raw extracted text into candidate fragments. The
//! [`Segmenter`] implementations wrap it per retrieval granularity:
//!
//! - [`LineSegmenter`]: one fragment per sufficiently long line
//! - [`DocumentSegmenter`]: one unit per document, with a [`DocumentProfile`]

use crate::category::categorize;
use crate::config::{DEFAULT_PREVIEW_CHARS, Granularity};
use crate::document::{DocumentProfile, Fragment, SourceDocument, preview};

/// Fragments with this many characters or fewer (after trimming) are discarded.
pub const MIN_FRAGMENT_CHARS: usize = 20;

/// Split `raw_text` into trimmed line fragments longer than [`MIN_FRAGMENT_CHARS`].
///
/// Splitting happens on `\n` only; there is no sentence or paragraph awareness
/// and no overlap between fragments. The returned iterator is lazy and can be
/// cloned to restart it.
///
/// # Example
///
/// ```rust,ignore
/// use docsense_rag::normalize;
///
/// let fragments: Vec<&str> = normalize("The quick brown fox troubleshooting guide\nok").collect();
/// assert_eq!(fragments, ["The quick brown fox troubleshooting guide"]);
/// ```
pub fn normalize(raw_text: &str) -> impl Iterator<Item = &str> + Clone {
    raw_text.split('\n').map(str::trim).filter(|candidate| is_retrievable(candidate))
}

/// Whether an already trimmed candidate is long enough to be retrieved.
pub fn is_retrievable(candidate: &str) -> bool {
    candidate.chars().count() > MIN_FRAGMENT_CHARS
}

/// A strategy for turning a document into retrieval units.
///
/// Implementations produce [`Fragment`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Segmenter: Send + Sync {
    /// Split a document into units. Returns an empty `Vec` if nothing is retrievable.
    fn segment(&self, document: &SourceDocument) -> Vec<Fragment>;
}

/// Emits one fragment per retrievable line of the document.
///
/// Fragment IDs are generated as `{filename}_{line_index}`, where the index
/// counts retained fragments only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSegmenter;

impl Segmenter for LineSegmenter {
    fn segment(&self, document: &SourceDocument) -> Vec<Fragment> {
        normalize(&document.text)
            .enumerate()
            .map(|(i, text)| Fragment {
                id: format!("{}_{i}", document.filename),
                text: text.to_string(),
                source_document: Some(document.filename.clone()),
                embedding: Vec::new(),
                profile: None,
            })
            .collect()
    }
}

/// Emits the whole (trimmed) document as a single unit with a category and preview.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSegmenter {
    preview_chars: usize,
}

impl DocumentSegmenter {
    /// Create a segmenter whose previews keep `preview_chars` characters.
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }
}

impl Default for DocumentSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CHARS)
    }
}

impl Segmenter for DocumentSegmenter {
    fn segment(&self, document: &SourceDocument) -> Vec<Fragment> {
        let text = document.text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let profile = DocumentProfile {
            filename: document.filename.clone(),
            category: categorize(text),
            preview: preview(text, self.preview_chars),
        };
        vec![Fragment {
            id: document.filename.clone(),
            text: text.to_string(),
            source_document: Some(document.filename.clone()),
            embedding: Vec::new(),
            profile: Some(profile),
        }]
    }
}

/// The segmenter matching a retrieval granularity.
pub fn segmenter_for(granularity: Granularity, preview_chars: usize) -> Box<dyn Segmenter> {
    match granularity {
        Granularity::Fragment => Box::new(LineSegmenter),
        Granularity::Document => Box::new(DocumentSegmenter::new(preview_chars)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn keeps_only_lines_longer_than_threshold() {
        let text = "The quick brown fox troubleshooting guide\nok";
        let fragments: Vec<&str> = normalize(text).collect();
        assert_eq!(fragments, vec!["The quick brown fox troubleshooting guide"]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let exactly_twenty = "a".repeat(20);
        let twenty_one = "b".repeat(21);
        let text = format!("{exactly_twenty}\n{twenty_one}");
        let fragments: Vec<&str> = normalize(&text).collect();
        assert_eq!(fragments, vec![twenty_one.as_str()]);
    }

    #[test]
    fn trims_whitespace_and_carriage_returns() {
        let text = "   Calibrate the receiver before each survey   \r\n\t\n";
        let fragments: Vec<&str> = normalize(text).collect();
        assert_eq!(fragments, vec!["Calibrate the receiver before each survey"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 20 two-byte characters: 40 bytes but still too short.
        let text = "é".repeat(20);
        assert_eq!(normalize(&text).count(), 0);
    }

    #[test]
    fn iterator_is_restartable() {
        let fragments =
            normalize("first line that is long enough\nsecond line that is long enough");
        let again = fragments.clone();
        assert_eq!(fragments.collect::<Vec<_>>(), again.collect::<Vec<_>>());
    }

    #[test]
    fn line_segmenter_tags_source_document() {
        let doc = SourceDocument::new(
            "guide.txt",
            "Check the battery contacts for corrosion\nshort\n\
             Restart the controller after a firmware update",
        );
        let fragments = LineSegmenter.segment(&doc);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].id, "guide.txt_0");
        assert_eq!(fragments[1].id, "guide.txt_1");
        assert!(fragments.iter().all(|f| f.source_document.as_deref() == Some("guide.txt")));
        assert!(fragments.iter().all(|f| f.embedding.is_empty() && f.profile.is_none()));
    }

    #[test]
    fn document_segmenter_builds_profile() {
        let body = format!("Troubleshooting error codes\n{}", "x".repeat(400));
        let doc = SourceDocument::new("faults.txt", format!("  {body}  "));
        let units = DocumentSegmenter::default().segment(&doc);
        assert_eq!(units.len(), 1);

        let unit = &units[0];
        assert_eq!(unit.text, body);
        let profile = unit.profile.as_ref().unwrap();
        assert_eq!(profile.filename, "faults.txt");
        assert_eq!(profile.category, Category::Troubleshooting);
        assert_eq!(profile.preview.chars().count(), 303);
        assert!(profile.preview.ends_with("..."));
    }

    #[test]
    fn document_segmenter_skips_blank_documents() {
        let doc = SourceDocument::new("blank.txt", " \n\t ");
        assert!(DocumentSegmenter::default().segment(&doc).is_empty());
    }
}
