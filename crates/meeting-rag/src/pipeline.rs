//! Query orchestration: retrieve → format → prompt → synthesize
//!
//! Also hosts the interactive loop, modeled as an explicit state machine so
//! quit handling and per-turn error recovery are ordinary control flow.

use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::error::Result;
use crate::generation::{PromptBuilder, NOT_FOUND_ANSWER};
use crate::providers::LlmProvider;
use crate::retrieval::Retriever;
use crate::types::Chunk;

/// A synthesized answer plus the source files that fed its context
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

/// One state transition of the interactive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next line
    AwaitingInput,
    /// A question is being processed
    Processing(String),
    /// Quit command or end of input
    Terminated,
}

impl LoopState {
    /// Classify one line of input. `None` means end of input.
    pub fn from_input(line: Option<&str>) -> Self {
        let Some(line) = line else {
            return Self::Terminated;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::AwaitingInput;
        }
        match trimmed.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Self::Terminated,
            _ => Self::Processing(trimmed.to_string()),
        }
    }
}

/// The RAG query pipeline
pub struct QueryPipeline {
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
}

impl QueryPipeline {
    pub fn new(retriever: Retriever, llm: Arc<dyn LlmProvider>) -> Self {
        Self { retriever, llm }
    }

    /// Answer one question. Each call is independent; no conversational
    /// state carries over between questions.
    ///
    /// When retrieval returns nothing the not-found answer is returned
    /// directly, without handing the model an empty context to improvise on.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let results = self.retriever.retrieve(question).await?;

        if results.is_empty() {
            return Ok(Answer {
                text: NOT_FOUND_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let chunks: Vec<Chunk> = results.into_iter().map(|r| r.chunk).collect();
        let context = PromptBuilder::build_context(&chunks);
        let prompt = PromptBuilder::build_prompt(question, &context);

        tracing::debug!("Synthesizing answer from {} chunks", chunks.len());
        let text = self.llm.complete(&prompt).await?;

        let mut sources = Vec::new();
        for chunk in &chunks {
            if !sources.contains(&chunk.source.source_file) {
                sources.push(chunk.source.source_file.clone());
            }
        }

        Ok(Answer { text, sources })
    }

    /// Run the interactive question loop.
    ///
    /// Empty lines are ignored; `quit`/`exit`/`q` (case-insensitive) or end
    /// of input terminates. A provider failure is reported and the loop
    /// continues with the next question.
    pub async fn run_interactive<R: BufRead, W: Write>(
        &self,
        input: R,
        output: &mut W,
    ) -> Result<()> {
        let mut lines = input.lines();

        writeln!(output, "Ask questions about your meeting notes.")?;
        writeln!(output, "Type 'quit' or 'exit' to stop.")?;

        loop {
            write!(output, "\nYou: ")?;
            output.flush()?;

            let line = lines.next().transpose()?;
            match LoopState::from_input(line.as_deref()) {
                LoopState::AwaitingInput => continue,
                LoopState::Terminated => {
                    writeln!(output, "Goodbye!")?;
                    return Ok(());
                }
                LoopState::Processing(question) => match self.answer(&question).await {
                    Ok(answer) => {
                        writeln!(output, "\nAssistant: {}", answer.text)?;
                        if !answer.sources.is_empty() {
                            writeln!(output, "Sources: {}", answer.sources.join(", "))?;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Query failed: {}", e);
                        writeln!(output, "\nError: {}", e)?;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::ingestion::TextChunker;
    use crate::providers::mock::{MockEmbedder, MockLlm};
    use crate::providers::EmbeddingProvider;
    use crate::retrieval::VectorIndex;
    use crate::types::{Document, DocumentSource};

    fn pipeline_with_notes(
        notes: &[(&str, &str)],
        llm: Arc<MockLlm>,
        storage: &std::path::Path,
    ) -> QueryPipeline {
        let config = RagConfig::default();
        let chunker = TextChunker::from_config(&config.chunking);
        let mut index = VectorIndex::open_or_create(storage, "meeting_notes").unwrap();

        for (file, text) in notes {
            let doc = Document::new(
                text.to_string(),
                DocumentSource::pdf_page(file.to_string(), 1, 1),
            );
            for chunk in chunker.chunk_document(&doc) {
                let embedding = MockEmbedder::embed_sync(&chunk.text);
                index.insert(chunk, embedding).unwrap();
            }
        }

        let retriever = Retriever::new(Arc::new(MockEmbedder::new()), index, 4);
        QueryPipeline::new(retriever, llm)
    }

    #[test]
    fn input_classification() {
        assert_eq!(LoopState::from_input(None), LoopState::Terminated);
        assert_eq!(LoopState::from_input(Some("quit")), LoopState::Terminated);
        assert_eq!(LoopState::from_input(Some("EXIT")), LoopState::Terminated);
        assert_eq!(LoopState::from_input(Some(" q ")), LoopState::Terminated);
        assert_eq!(LoopState::from_input(Some("")), LoopState::AwaitingInput);
        assert_eq!(LoopState::from_input(Some("   ")), LoopState::AwaitingInput);
        assert_eq!(
            LoopState::from_input(Some("when was kickoff?")),
            LoopState::Processing("when was kickoff?".to_string())
        );
    }

    #[tokio::test]
    async fn answer_grounds_the_prompt_in_retrieved_notes() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::new(
            "Project Alpha kicked off on March 3 [Source: kickoff.pdf]",
        ));
        let pipeline = pipeline_with_notes(
            &[("kickoff.pdf", "Project Alpha kickoff on March 3.")],
            Arc::clone(&llm),
            storage.path(),
        );

        let answer = pipeline.answer("When did Project Alpha kick off?").await.unwrap();

        assert!(answer.text.contains("March 3"));
        assert_eq!(answer.sources, vec!["kickoff.pdf".to_string()]);

        // The prompt handed to the model carries the retrieved sentence and
        // its source tag.
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Project Alpha kickoff on March 3."));
        assert!(prompts[0].contains("[Source: kickoff.pdf"));
        assert!(prompts[0].contains("QUESTION: When did Project Alpha kick off?"));
    }

    #[tokio::test]
    async fn empty_collection_short_circuits_the_llm() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::new("should never be asked"));
        let pipeline = pipeline_with_notes(&[], Arc::clone(&llm), storage.path());

        let answer = pipeline.answer("Anything in the notes?").await.unwrap();

        assert_eq!(answer.text, NOT_FOUND_ANSWER);
        assert!(answer.sources.is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn sources_are_deduplicated_in_order() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::new("answer"));
        let pipeline = pipeline_with_notes(
            &[
                ("standup.pdf", "Alice demoed the new dashboard to the team."),
                ("standup.pdf", "Bob will follow up on the dashboard metrics."),
                ("retro.pdf", "The dashboard rollout went smoothly overall."),
            ],
            llm,
            storage.path(),
        );

        let answer = pipeline.answer("What happened with the dashboard?").await.unwrap();
        assert_eq!(answer.sources.len(), 2);
        assert!(answer.sources.contains(&"standup.pdf".to_string()));
        assert!(answer.sources.contains(&"retro.pdf".to_string()));
    }

    #[tokio::test]
    async fn provider_failure_does_not_terminate_the_loop() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::failing_first("The deadline is Friday.", 1));
        let pipeline = pipeline_with_notes(
            &[("plan.pdf", "The release deadline is Friday.")],
            Arc::clone(&llm),
            storage.path(),
        );

        let input = b"first question\nsecond question\nquit\n" as &[u8];
        let mut output = Vec::new();
        pipeline.run_interactive(input, &mut output).await.unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("Error: LLM error: simulated provider outage"));
        assert!(transcript.contains("Assistant: The deadline is Friday."));
        assert!(transcript.contains("Goodbye!"));
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn empty_lines_are_ignored_by_the_loop() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::new("answer"));
        let pipeline = pipeline_with_notes(
            &[("plan.pdf", "Notes about the plan.")],
            Arc::clone(&llm),
            storage.path(),
        );

        let input = b"\n   \nexit\n" as &[u8];
        let mut output = Vec::new();
        pipeline.run_interactive(input, &mut output).await.unwrap();

        assert_eq!(llm.calls(), 0);
        assert!(String::from_utf8(output).unwrap().contains("Goodbye!"));
    }

    #[tokio::test]
    async fn end_of_input_terminates_the_loop() {
        let storage = tempfile::tempdir().unwrap();
        let llm = Arc::new(MockLlm::new("answer"));
        let pipeline = pipeline_with_notes(&[], llm, storage.path());

        let input = b"" as &[u8];
        let mut output = Vec::new();
        pipeline.run_interactive(input, &mut output).await.unwrap();
        assert!(String::from_utf8(output).unwrap().contains("Goodbye!"));
    }

    #[tokio::test]
    async fn questions_are_reembedded_every_call() {
        let storage = tempfile::tempdir().unwrap();
        let embedder = Arc::new(MockEmbedder::new());
        let mut index = VectorIndex::open_or_create(storage.path(), "meeting_notes").unwrap();
        index
            .insert(
                crate::types::Chunk::new(
                    "note".to_string(),
                    DocumentSource::pdf_page("a.pdf".to_string(), 1, 1),
                    0,
                ),
                MockEmbedder::embed_sync("note"),
            )
            .unwrap();
        let retriever = Retriever::new(Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>, index, 4);
        let pipeline = QueryPipeline::new(retriever, Arc::new(MockLlm::new("ok")));

        pipeline.answer("q1").await.unwrap();
        pipeline.answer("q1").await.unwrap();
        assert_eq!(embedder.calls(), 2);
    }
}
