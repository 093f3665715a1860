//! On-disk vector index with brute-force cosine search
//!
//! A collection is a single JSON file `<storage_dir>/<collection>.json`
//! holding every indexed record. At meeting-notes scale an exhaustive scan
//! is exact and fast enough; the file layout keeps re-ingestion append-only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Chunk;

/// The persisted triple: chunk text + metadata + its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedRecord {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
    /// When the record was appended to the collection
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is better)
    pub similarity: f32,
}

/// A named, on-disk persisted collection of indexed records
pub struct VectorIndex {
    file: PathBuf,
    records: Vec<IndexedRecord>,
}

impl VectorIndex {
    fn collection_file(storage_dir: &Path, collection: &str) -> PathBuf {
        storage_dir.join(format!("{}.json", collection))
    }

    /// Open an existing collection.
    ///
    /// A collection that has never been ingested is the distinct
    /// `Error::NotInitialized`, so callers can tell the user to run
    /// ingestion instead of failing deep in the retrieval path.
    pub fn open(storage_dir: &Path, collection: &str) -> Result<Self> {
        let file = Self::collection_file(storage_dir, collection);
        if !file.exists() {
            return Err(Error::NotInitialized(file));
        }

        let content = std::fs::read_to_string(&file)?;
        let records: Vec<IndexedRecord> = serde_json::from_str(&content)?;
        tracing::debug!(
            "Opened collection '{}' with {} records",
            collection,
            records.len()
        );

        Ok(Self { file, records })
    }

    /// Open a collection, creating an empty one if it does not exist yet.
    /// Used by ingestion, which appends across runs.
    pub fn open_or_create(storage_dir: &Path, collection: &str) -> Result<Self> {
        match Self::open(storage_dir, collection) {
            Ok(index) => Ok(index),
            Err(Error::NotInitialized(file)) => {
                std::fs::create_dir_all(storage_dir)?;
                Ok(Self {
                    file,
                    records: Vec::new(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Append one record. The embedding must be non-empty and match the
    /// dimensions of the records already stored.
    pub fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::vector_db("chunk has an empty embedding"));
        }
        if let Some(first) = self.records.first() {
            if first.embedding.len() != embedding.len() {
                return Err(Error::vector_db(format!(
                    "embedding dimension mismatch: collection has {}, got {}",
                    first.embedding.len(),
                    embedding.len()
                )));
            }
        }

        self.records.push(IndexedRecord {
            chunk,
            embedding,
            ingested_at: chrono::Utc::now(),
        });
        Ok(())
    }

    /// Append a batch of chunks with their embeddings
    pub fn insert_batch(&mut self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(Error::vector_db(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            self.insert(chunk.clone(), embedding.clone())?;
        }
        Ok(())
    }

    /// Return the `min(k, N)` records closest to the query vector, ordered
    /// by non-increasing cosine similarity. An empty collection yields an
    /// empty result, not an error.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .records
            .iter()
            .map(|record| ScoredChunk {
                chunk: record.chunk.clone(),
                similarity: cosine_similarity(query, &record.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(k);
        results
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Durably write the collection. Writes to a temporary file and renames
    /// so an interrupted run never truncates an existing collection.
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        let tmp = self.file.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.file)?;
        tracing::info!(
            "Persisted {} records to {}",
            self.records.len(),
            self.file.display()
        );
        Ok(())
    }
}

/// Cosine similarity with a zero-norm guard
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
