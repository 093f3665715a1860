//! Meeting Memory Assistant CLI
//!
//! `meeting-rag ingest` indexes the configured PDF directory;
//! `meeting-rag query` opens the interactive question loop.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meeting_rag::config::RagConfig;
use meeting_rag::error::Error;
use meeting_rag::ingestion::run_ingestion;
use meeting_rag::pipeline::QueryPipeline;
use meeting_rag::providers::build_providers;
use meeting_rag::retrieval::{Retriever, VectorIndex};

#[derive(Parser)]
#[command(name = "meeting-rag", version, about = "Question answering over PDF meeting notes")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "meeting-rag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest PDF meeting notes into the vector collection
    Ingest,
    /// Ask questions about the ingested meeting notes
    Query,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meeting_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Bad configuration aborts before any pipeline work.
    let config = RagConfig::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Command::Ingest => ingest(&config).await,
        Command::Query => query(&config).await,
    }
}

async fn ingest(config: &RagConfig) -> anyhow::Result<()> {
    banner("Meeting Notes Ingestion");

    let (embedder, _) = build_providers(config);

    println!("\nLoading PDFs from: {}", config.notes_dir().display());
    let summary = run_ingestion(config, embedder.as_ref()).await?;

    if summary.documents == 0 {
        println!(
            "\nNo documents to process. Add PDF files to {}",
            config.notes_dir().display()
        );
        return Ok(());
    }

    println!("\nLoaded {} pages from PDF files", summary.documents);
    println!("Created {} chunks", summary.chunks);
    println!(
        "Collection '{}' now holds {} records at {}",
        config.index.collection,
        summary.total_records,
        config.index.storage_dir.display()
    );

    banner("Ingestion complete!");
    Ok(())
}

async fn query(config: &RagConfig) -> anyhow::Result<()> {
    banner("Meeting Memory Assistant");

    let index = match VectorIndex::open(&config.index.storage_dir, &config.index.collection) {
        Ok(index) => index,
        Err(Error::NotInitialized(_)) => {
            println!("\nNo vector collection found. Run 'meeting-rag ingest' first.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if index.is_empty() {
        println!("\nVector collection is empty. Run 'meeting-rag ingest' first.");
        return Ok(());
    }

    println!("\nLoaded {} document chunks", index.len());

    let (embedder, llm) = build_providers(config);
    if !embedder.health_check().await.unwrap_or(false) {
        tracing::warn!("Ollama not reachable at {}", config.llm.base_url);
        tracing::warn!("Start it with `ollama serve` and pull the models:");
        tracing::warn!(
            "  ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    let retriever = Retriever::new(embedder, index, config.retrieval.top_k);
    let pipeline = QueryPipeline::new(retriever, llm);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    pipeline.run_interactive(stdin.lock(), &mut stdout).await?;

    Ok(())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(50));
    println!("{}", title);
    println!("{}", "=".repeat(50));
}
