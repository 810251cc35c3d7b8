//! Subcommand implementations
//!
//! Each command writes its result as JSON on stdout; logs go to stderr.

pub mod chunk;
pub mod memory;
pub mod run;
pub mod thread;

use serde::Serialize;
use std::io::Write;

/// Write `value` as pretty JSON followed by a newline
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
