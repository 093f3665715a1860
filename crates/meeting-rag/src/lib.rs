//! meeting-rag: question answering over PDF meeting notes
//!
//! A retrieval-augmented generation pipeline in two phases: ingestion turns
//! a directory of PDF meeting notes into a persisted vector collection, and
//! the query pipeline retrieves the most relevant chunks for a question and
//! synthesizes a grounded, source-cited answer with a local LLM.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::{Answer, QueryPipeline};
pub use types::{Chunk, Document, DocumentSource};
