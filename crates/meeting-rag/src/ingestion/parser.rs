//! PDF text extraction with page-level source tracking

use crate::error::{Error, Result};
use crate::types::{Document, DocumentSource};

/// PDF parser producing one `Document` per page
pub struct PdfParser;

impl PdfParser {
    /// Parse a PDF into page-level documents.
    ///
    /// Pages with no extractable text are dropped. A PDF where no page has
    /// extractable text is a parse error (likely image-based or encrypted).
    pub fn parse(filename: &str, data: &[u8]) -> Result<Vec<Document>> {
        let page_texts = Self::extract_pages(filename, data)?;
        let page_count = Self::page_count(data).unwrap_or(page_texts.len() as u32);

        let documents: Vec<Document> = page_texts
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                let text = cleanup_text(&raw);
                if text.is_empty() {
                    tracing::debug!("Skipping empty page {} of {}", i + 1, filename);
                    return None;
                }
                Some(Document::new(
                    text,
                    DocumentSource::pdf_page(filename.to_string(), i as u32 + 1, page_count),
                ))
            })
            .collect();

        if documents.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        Ok(documents)
    }

    /// Extract raw text per page, falling back to whole-document extraction
    /// when per-page extraction fails.
    fn extract_pages(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        match pdf_extract::extract_text_from_mem_by_pages(data) {
            Ok(pages) => Ok(pages),
            Err(e) => {
                tracing::warn!(
                    "Per-page extraction failed for {}: {}, trying whole-document extraction",
                    filename,
                    e
                );
                let content = pdf_extract::extract_text_from_mem(data)
                    .map_err(|e| Error::file_parse(filename, e.to_string()))?;
                Ok(vec![content])
            }
        }
    }

    /// Count pages via lopdf
    fn page_count(data: &[u8]) -> Option<u32> {
        lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32)
    }
}

/// Clean up extracted PDF text: normalize typographic characters that common
/// PDF fonts emit, strip NULs, and drop blank lines.
fn cleanup_text(text: &str) -> String {
    let normalized = text
        .replace('\0', "")
        .replace('\u{2010}', "-") // hyphen
        .replace('\u{2013}', "-") // en dash
        .replace('\u{2014}', "--") // em dash
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2022}', "* ") // bullet
        .replace('\u{2026}', "...") // ellipsis
        .replace('\u{00A0}', " ") // non-breaking space
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl");

    normalized
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
