//! Main entry point for the pipekit CLI

// Internal modules
mod commands;
mod config;

// Internal imports (std, crate)
use crate::commands::chunk::ChunkArgs;
use crate::commands::memory::MemoryCommand;
use crate::commands::run::RunArgs;
use crate::commands::thread::ThreadArgs;
use std::path::PathBuf;

// External imports (alphabetized)
use clap::{Parser, Subcommand};
use pipekit_common::init_logging;
use tracing::debug;

/// pipekit: chunk memory documents, assemble pipe threads and run pipes
///
/// Results are printed as JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults to ./pipekit.toml when present
    #[arg(long, short = 'c', global = true)]
    config_file: Option<PathBuf>,

    /// Also write rotating log files into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Write log files even without a configured directory
    #[arg(long, global = true)]
    file_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a document into chunks
    Chunk(ChunkArgs),

    /// Assemble the message thread a pipe would send
    Thread(ThreadArgs),

    /// Manage memory configuration records
    #[command(subcommand)]
    Memory(MemoryCommand),

    /// Run a pipe through the pipe API
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = config::load(args.config_file.as_deref())?;
    let _logging = init_logging(&config::log_options(
        &config.logging,
        args.log_dir.clone(),
        args.file_logs,
    ))?;
    debug!(target = "command", event = "startup", command = ?args.command);

    match &args.command {
        Command::Chunk(chunk) => commands::chunk::execute(&config, chunk),
        Command::Thread(thread) => commands::thread::execute(&config, thread),
        Command::Memory(memory) => commands::memory::execute(&config, memory),
        Command::Run(run) => commands::run::execute(&config, run).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_thread_accepts_repeated_variables() {
        let args = Args::parse_from([
            "pipekit", "thread", "--pipe", "pipe.toml", "--messages", "messages.json", "--var",
            "name=Ada", "--var", "topic=rust",
        ]);
        let Command::Thread(thread) = args.command else {
            panic!("expected thread command");
        };
        assert_eq!(
            thread.variables,
            vec![
                ("name".to_string(), "Ada".to_string()),
                ("topic".to_string(), "rust".to_string())
            ]
        );
    }

    #[test]
    fn test_memory_deploy_arguments() {
        let args = Args::parse_from(["pipekit", "memory", "deploy", "docs/memory.toml", "abc123"]);
        let Command::Memory(MemoryCommand::Deploy { config, commit }) = args.command else {
            panic!("expected memory deploy");
        };
        assert_eq!(config, PathBuf::from("docs/memory.toml"));
        assert_eq!(commit, "abc123");
    }
}
