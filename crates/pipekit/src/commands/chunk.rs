//! `pipekit chunk`: split a document into memory chunks

// Internal imports (std, crate)
use pipekit_chunking::{ChunkingConfig, ChunkingReport, Language, RecursiveTextSplitter};
use pipekit_config::ApplicationConfig;
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Document to split
    pub file: PathBuf,

    /// Maximum chunk length in characters
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Separator preset (defaults to one matching the file extension)
    #[arg(long)]
    pub language: Option<Language>,
}

/// Split the file and print the chunks and warnings
pub fn execute(config: &ApplicationConfig, args: &ChunkArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let report = chunk_text(config, args, &text)?;
    info!(
        target = "command",
        event = "chunked",
        file = %args.file.display(),
        chunks = report.chunks.len(),
        warnings = report.warnings.len()
    );
    super::print_json(&report)
}

fn chunk_text(
    config: &ApplicationConfig,
    args: &ChunkArgs,
    text: &str,
) -> anyhow::Result<ChunkingReport> {
    let chunking = ChunkingConfig::new(
        args.max_length.unwrap_or(config.chunking.chunk_max_length),
        args.overlap.unwrap_or(config.chunking.chunk_overlap),
    );

    let splitter = match args.language.or_else(|| detect_language(&args.file)) {
        Some(language) => RecursiveTextSplitter::from_language(language, chunking)?,
        None => RecursiveTextSplitter::new(chunking)?,
    };
    Ok(splitter.create_chunks_with_report(text))
}

fn detect_language(path: &Path) -> Option<Language> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Language::from_extension)
}
