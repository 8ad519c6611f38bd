//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod file;
mod model;
mod overload;
mod table;

pub use file::FileCommands;
pub use model::ModelCommands;
pub use overload::OverloadCommands;
pub use table::TableCommands;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Metric table browsing and maintenance
    Table {
        #[command(subcommand)]
        command: TableCommands,
    },
    /// Import model listing and execution
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
    /// Data file management
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    /// Burst high-load cell report
    Overload {
        #[command(subcommand)]
        command: OverloadCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Table { command } => table::handle_table_command(command, config).await,
        Commands::Model { command } => model::handle_model_command(command, config).await,
        Commands::File { command } => file::handle_file_command(command, config).await,
        Commands::Overload { command } => {
            overload::handle_overload_command(command, config).await
        }
    }
}

/// Ask a yes/no question on the terminal; anything but "y"/"yes" is a no
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Where to write a download
///
/// Only the last component of the backend's `suggested` name is used;
/// `fallback` applies when nothing usable is left. The file goes into
/// `output` if it is a directory, to `output` itself otherwise, or into the
/// current directory.
fn download_path(output: Option<&Path>, suggested: Option<&str>, fallback: &str) -> PathBuf {
    let file_name = suggested
        .and_then(plain_file_name)
        .or_else(|| plain_file_name(fallback))
        .unwrap_or("download");

    match output {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// Final component of `name`, unless that is empty, `.` or `..`
fn plain_file_name(name: &str) -> Option<&str> {
    let last = name.rsplit(['/', '\\']).next()?;
    Path::new(last)
        .file_name()
        .and_then(|part| part.to_str())
        .filter(|part| *part == last)
}
