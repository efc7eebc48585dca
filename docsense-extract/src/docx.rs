//! DOCX text extractor.
//!
//! A DOCX file is a zip archive; the body text lives in `word/document.xml`
//! as `<w:t>` runs grouped into `<w:p>` paragraphs.

use std::io::{Cursor, Read};

use docsense_rag::{DocumentExtractor, ExtractionFailure, FileDescriptor};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts the body text of a Word document.
///
/// Each paragraph becomes one line, so paragraphs map directly onto the
/// normalizer's line fragments. `<w:tab/>` becomes a tab and `<w:br/>` a line
/// break.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocumentExtractor for DocxExtractor {
    fn extract(&self, file: &FileDescriptor) -> Result<String, ExtractionFailure> {
        let corrupt =
            |reason: String| ExtractionFailure::Corrupt { filename: file.filename.clone(), reason };

        let mut archive = ZipArchive::new(Cursor::new(file.content.as_slice()))
            .map_err(|e| corrupt(e.to_string()))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| corrupt(format!("{DOCUMENT_PART}: {e}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml).map_err(|e| ExtractionFailure::Encoding {
            filename: file.filename.clone(),
            reason: e.to_string(),
        })?;

        let text = text_from_document_xml(&xml).map_err(corrupt)?;
        debug!(document = %file.filename, chars = text.len(), "extracted docx text");
        Ok(text)
    }
}

/// Collect the visible text of a WordprocessingML body.
///
/// Only character data inside `<w:t>` elements is kept; markup such as
/// field instructions and properties is dropped.
pub fn text_from_document_xml(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = true,
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_run_text => {
                text.push_str(&e.unescape().map_err(|e| e.to_string())?);
            }
            Event::CData(e) if in_run_text => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
