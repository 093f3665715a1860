//! Vector index persistence and similarity retrieval

pub mod retriever;
pub mod store;

pub use retriever::Retriever;
pub use store::{cosine_similarity, IndexedRecord, ScoredChunk, VectorIndex};
