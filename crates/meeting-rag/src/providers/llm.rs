//! LLM provider trait for answer synthesis

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM completion over a fully composed prompt
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
