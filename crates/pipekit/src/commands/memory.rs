//! `pipekit memory`: memory configuration records

// Internal imports (std, crate)
use pipekit_config::{ApplicationConfig, LogCategory, record_deployed_commit, validate_memory_name};
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Subcommand;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum MemoryCommand {
    /// Record the commit a memory was last deployed from
    Deploy {
        /// Memory configuration file, or the name of a memory in the memory directory
        config: PathBuf,

        /// Commit hash to record
        commit: String,
    },
}

pub fn execute(config: &ApplicationConfig, command: &MemoryCommand) -> anyhow::Result<()> {
    match command {
        MemoryCommand::Deploy {
            config: path,
            commit,
        } => {
            let path = resolve_config_path(config, path);
            let memory = record_deployed_commit(&path, commit)
                .with_context(|| format!("Failed to record commit in {}", path.display()))?;
            if config.logging.should_log(LogCategory::Memory) {
                info!(
                    target = "command",
                    event = "memory_deployed",
                    memory = %memory.name,
                    commit = %memory.git.deployed_at
                );
            }
            super::print_json(&memory)
        }
    }
}

/// An existing file is used as is; a bare memory name maps into the memory directory
///
/// Memory names may contain dots, so only a `.toml` suffix marks a file path.
fn resolve_config_path(config: &ApplicationConfig, target: &Path) -> PathBuf {
    if target.is_file() {
        return target.to_path_buf();
    }
    let is_toml = target.extension().is_some_and(|ext| ext == "toml");
    match target.to_str() {
        Some(name) if !is_toml && validate_memory_name(name).is_ok() => {
            config.memory.memory_config_path(name)
        }
        _ => target.to_path_buf(),
    }
}
