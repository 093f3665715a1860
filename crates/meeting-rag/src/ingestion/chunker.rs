//! Text chunking with configurable size and overlap
//!
//! Break points are tried in priority order: paragraph break, line break,
//! sentence-ending punctuation, plain space. A hard character cut is the
//! last resort, so a chunk only exceeds its target when a single unbroken
//! run of text leaves no valid break point.

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Break points in priority order
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// Text chunker with configurable size and overlap (both in characters)
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. Callers validate `overlap < chunk_size` via
    /// `RagConfig::validate` before construction.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Chunk a sequence of documents, preserving document order
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.chunk_document(doc))
            .collect()
    }

    /// Chunk one document. Every chunk inherits the document's source
    /// unchanged. An empty document yields no chunks.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        self.split_text(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, doc.source.clone(), i as u32))
            .collect()
    }

    /// Split text into overlapping pieces of at most `chunk_size` characters
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        let mut start = 0usize;

        while start < text.len() {
            let window_end = advance_chars(text, start, self.chunk_size);

            let end = if window_end == text.len() {
                text.len()
            } else {
                self.find_break(&text[start..window_end])
                    .map(|cut| start + cut)
                    .unwrap_or(window_end)
            };

            let piece = text[start..end].trim();
            if !piece.is_empty() {
                pieces.push(piece.to_string());
            }

            if end == text.len() {
                break;
            }

            // Step back by the overlap so boundary regions appear in both
            // chunks. If the chunk was shorter than the overlap, continue
            // from its end to guarantee forward progress.
            let overlap_start = retreat_chars(text, end, self.overlap);
            start = if overlap_start > start {
                overlap_start
            } else {
                end
            };
        }

        pieces
    }

    /// Find the best break point within a window, as a byte offset past the
    /// separator. Returns `None` when the window has no usable break.
    fn find_break(&self, window: &str) -> Option<usize> {
        for sep in SEPARATORS {
            if let Some(pos) = window.rfind(sep) {
                if pos > 0 {
                    return Some(pos + sep.len());
                }
            }
        }
        None
    }
}

/// Byte offset `n` characters after `start`, clamped to the end of `text`
fn advance_chars(text: &str, start: usize, n: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len())
}

/// Byte offset `n` characters before `end`
fn retreat_chars(text: &str, end: usize, n: usize) -> usize {
    let mut offset = end;
    for _ in 0..n {
        match text[..offset].char_indices().next_back() {
            Some((i, _)) => offset = i,
            None => return 0,
        }
    }
    offset
}
