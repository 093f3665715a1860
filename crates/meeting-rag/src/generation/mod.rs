//! Prompt assembly for answer synthesis

pub mod prompt;

pub use prompt::{PromptBuilder, NOT_FOUND_ANSWER};
