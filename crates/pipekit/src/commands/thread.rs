//! `pipekit thread`: assemble the messages a pipe would send

// Internal imports (std, crate)
use pipekit_config::{ApplicationConfig, LogCategory};
use pipekit_thread::{Message, Pipe, SimilarChunk, Variables, build_thread};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::{Context, bail};
use clap::Args;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct ThreadArgs {
    /// Pipe definition (`.json` or `.toml`)
    #[arg(long)]
    pub pipe: PathBuf,

    /// JSON array of caller messages
    #[arg(long)]
    pub messages: PathBuf,

    /// JSON array of retrieved chunks for the pipe's memory
    #[arg(long)]
    pub chunks: Option<PathBuf>,

    /// Prompt variable as `name=value` (repeatable)
    #[arg(long = "var", value_parser = parse_variable)]
    pub variables: Vec<(String, String)>,
}

/// Build the thread and print it
pub fn execute(config: &ApplicationConfig, args: &ThreadArgs) -> anyhow::Result<()> {
    let pipe = Pipe::from_file(&args.pipe)
        .with_context(|| format!("Failed to load pipe {}", args.pipe.display()))?;
    let messages: Vec<Message> = read_json(&args.messages)?;
    let chunks: Option<Vec<SimilarChunk>> = args.chunks.as_deref().map(read_json).transpose()?;
    let variables: Variables = args.variables.iter().cloned().collect();

    let thread = build_thread(&pipe, &messages, chunks.as_deref(), Some(&variables))?;

    if config.logging.should_log(LogCategory::Pipe) {
        info!(
            target = "command",
            event = "thread_built",
            pipe = %pipe.name,
            messages = thread.len(),
            chunks = chunks.as_ref().map_or(0, Vec::len)
        );
        if config.logging.log_sensitive_data {
            debug!(target = "command", event = "thread", thread = ?thread);
        }
    }
    super::print_json(&thread)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Parse `name=value`; the value may itself contain `=`
pub fn parse_variable(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected name=value, got '{raw}'");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("variable name is empty in '{raw}'");
    }
    Ok((name.to_string(), value.to_string()))
}
