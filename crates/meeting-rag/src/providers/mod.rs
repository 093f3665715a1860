//! Provider abstractions for embeddings and answer synthesis
//!
//! Trait-based seams so the hosted services can be swapped (or mocked in
//! tests) without touching the rest of the pipeline.

pub mod embedding;
pub mod llm;
pub mod ollama;

#[cfg(test)]
pub(crate) mod mock;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};

use std::sync::Arc;

use crate::config::{BackendProvider, RagConfig};

/// Construct the embedding and LLM providers selected by the configuration
pub fn build_providers(config: &RagConfig) -> (Arc<dyn EmbeddingProvider>, Arc<dyn LlmProvider>) {
    match config.backend {
        BackendProvider::Ollama => {
            let client = Arc::new(OllamaClient::new(&config.llm));
            let embedder = OllamaEmbedder::new(Arc::clone(&client), config.llm.embed_model.clone());
            let llm = OllamaLlm::new(client, config.llm.generate_model.clone());
            (Arc::new(embedder), Arc::new(llm))
        }
    }
}
