//! Mock providers for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Deterministic embedder: a small character-class histogram, so identical
/// text always embeds identically and related text scores above noise.
pub struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn embed_sync(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; 32];
        for (i, byte) in text.bytes().enumerate() {
            vector[(byte as usize) % 32] += 1.0 + (i % 7) as f32 * 0.01;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::embed_sync(text))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Mock LLM that records every prompt and replies with a fixed answer.
/// Can be told to fail the first N calls to exercise per-turn error handling.
pub struct MockLlm {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
    failures_remaining: AtomicUsize,
}

impl MockLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
            failures_remaining: AtomicUsize::new(0),
        }
    }

    pub fn failing_first(reply: impl Into<String>, failures: usize) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
            failures_remaining: AtomicUsize::new(failures),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("mock lock poisoned")
            .push(prompt.to_string());

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::llm("simulated provider outage"));
        }

        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock-llm"
    }

    fn model(&self) -> &str {
        "mock"
    }
}
