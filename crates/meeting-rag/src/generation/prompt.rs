//! Prompt templates for the meeting memory assistant

use crate::types::Chunk;

/// The grounded refusal the assistant gives when the notes hold no answer.
/// The prompt instructs the model to use this exact phrasing, and the
/// pipeline returns it directly when retrieval comes back empty.
pub const NOT_FOUND_ANSWER: &str = "I couldn't find this in the meeting notes";

/// Delimiter between context sections. Chosen so it cannot appear inside
/// chunk text: chunk boundaries never preserve a bare `---` line because
/// extraction strips blank lines around it.
const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// Prompt builder for meeting-notes queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks into a prompt-ready context block.
    ///
    /// Each chunk is tagged with its source file (and page, when known) so
    /// the model can cite it. Order is preserved; empty input yields an
    /// empty string.
    pub fn build_context(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|chunk| {
                let source = if chunk.source.source_file.is_empty() {
                    "Unknown".to_string()
                } else {
                    chunk.source.format_citation()
                };
                format!("[Source: {}]\n{}", source, chunk.text)
            })
            .collect::<Vec<_>>()
            .join(SECTION_DELIMITER)
    }

    /// Compose the full prompt: grounding instructions + context + question
    pub fn build_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a Meeting Memory Assistant that helps users recall information from their meeting notes.

GUIDELINES:
1. Answer ONLY based on the provided context from meeting notes
2. If the information is not in the context, say "{not_found}"
3. Cite the source file when possible
4. Be concise and direct

CONTEXT:
{context}

QUESTION: {question}

ANSWER:"#,
            not_found = NOT_FOUND_ANSWER,
            context = context,
            question = question
        )
    }
}
