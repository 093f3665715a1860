//! Question-to-chunks retrieval

use std::sync::Arc;

use crate::error::Result;
use crate::providers::EmbeddingProvider;

use super::store::{ScoredChunk, VectorIndex};

/// Embeds a question and returns the top-k most similar chunks.
/// Every call re-embeds the question; there is no caching.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: VectorIndex, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Retrieve the most relevant chunks for a question, ranked by
    /// descending similarity
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>> {
        let query = self.embedder.embed(question).await?;
        Ok(self.index.search(&query, self.top_k))
    }

    /// Access the underlying index (record counts, emptiness checks)
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
