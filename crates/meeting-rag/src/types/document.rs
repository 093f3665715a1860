//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a piece of text came from.
///
/// Fixed named fields rather than an open metadata map so that source
/// information survives the whole pipeline with type-level guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Filename of the PDF the text was extracted from
    pub source_file: String,
    /// Page number (1-indexed)
    pub page_number: Option<u32>,
    /// Total pages in the document
    pub page_count: Option<u32>,
}

impl DocumentSource {
    /// Source info for one page of a PDF
    pub fn pdf_page(source_file: String, page_number: u32, page_count: u32) -> Self {
        Self {
            source_file,
            page_number: Some(page_number),
            page_count: Some(page_count),
        }
    }

    /// Format source for display, e.g. "notes.pdf, Page 2"
    pub fn format_citation(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.source_file, page),
            None => self.source_file.clone(),
        }
    }
}

/// One extracted PDF page, the unit the loader hands to the chunker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extracted plain text
    pub text: String,
    /// Source information, inherited unchanged by every chunk
    pub source: DocumentSource,
}

impl Document {
    pub fn new(text: String, source: DocumentSource) -> Self {
        Self { text, source }
    }
}

/// A bounded-length slice of document text, the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub text: String,
    /// Source information for citations
    pub source: DocumentSource,
    /// Chunk index within its document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: String, source: DocumentSource, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            source,
            chunk_index,
        }
    }
}
