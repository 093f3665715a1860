//! Ingestion pipeline: PDFs → pages → chunks → embeddings → vector index

pub mod chunker;
pub mod parser;

pub use chunker::TextChunker;
pub use parser::PdfParser;

use std::path::Path;

use walkdir::WalkDir;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;
use crate::types::Document;

/// Counts reported after an ingestion run
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    /// Pages extracted from PDF files
    pub documents: usize,
    /// Chunks embedded and appended in this run
    pub chunks: usize,
    /// Records in the collection after the run
    pub total_records: usize,
}

/// Load all PDF files from a directory as page-level documents.
///
/// Non-PDF files are ignored. A missing or empty directory is reported and
/// yields zero documents, not an error. Unreadable or malformed PDFs are
/// logged and skipped so one bad file never aborts the batch.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>> {
    if !dir.exists() {
        tracing::warn!("Directory not found: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut pdf_files: Vec<_> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdf_files.sort_by_key(|e| e.file_name().to_os_string());

    if pdf_files.is_empty() {
        tracing::warn!("No PDF files found in {}", dir.display());
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    for entry in pdf_files {
        let filename = entry.file_name().to_string_lossy().to_string();
        tracing::info!("Loading: {}", filename);

        let data = match std::fs::read(entry.path()) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Error reading {}: {}", filename, e);
                continue;
            }
        };

        match PdfParser::parse(&filename, &data) {
            Ok(docs) => documents.extend(docs),
            Err(e) => tracing::warn!("Error loading {}: {}", filename, e),
        }
    }

    Ok(documents)
}

/// Run the full ingestion pipeline and persist the collection.
///
/// Appends to an existing collection if one is present; re-running ingestion
/// over the same files therefore creates duplicate records. Wipe the storage
/// directory first to rebuild from scratch.
pub async fn run_ingestion(
    config: &RagConfig,
    embedder: &dyn EmbeddingProvider,
) -> Result<IngestSummary> {
    let documents = load_directory(&config.notes_dir())?;
    if documents.is_empty() {
        return Ok(IngestSummary::default());
    }
    tracing::info!("Loaded {} pages from PDF files", documents.len());

    let chunker = TextChunker::from_config(&config.chunking);
    let chunks = chunker.chunk_documents(&documents);
    tracing::info!("Created {} chunks", chunks.len());

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let mut index = VectorIndex::open_or_create(&config.index.storage_dir, &config.index.collection)?;
    index.insert_batch(&chunks, &embeddings)?;
    index.persist()?;

    Ok(IngestSummary {
        documents: documents.len(),
        chunks: chunks.len(),
        total_records: index.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::providers::mock::MockEmbedder;

    #[test]
    fn missing_directory_yields_no_documents() {
        let docs = load_directory(Path::new("/nonexistent/meeting_notes")).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn non_pdf_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain text").unwrap();
        std::fs::write(dir.path().join("agenda.md"), "# agenda").unwrap();

        let docs = load_directory(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn malformed_pdf_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not a pdf").unwrap();

        let docs = load_directory(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn empty_directory_leaves_collection_empty() {
        let notes = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();

        let mut config = RagConfig::default();
        config.notes_dir = Some(notes.path().to_path_buf());
        config.index.storage_dir = storage.path().to_path_buf();

        let embedder = MockEmbedder::new();
        let summary = run_ingestion(&config, &embedder).await.unwrap();

        assert_eq!(summary.documents, 0);
        assert_eq!(summary.chunks, 0);
        assert_eq!(summary.total_records, 0);
        // No side effects: the collection file was never created.
        assert!(!storage.path().join("meeting_notes.json").exists());
    }
}
