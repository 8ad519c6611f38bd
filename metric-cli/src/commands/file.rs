//! Data file command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use metric_client::BackendClient;
use metric_core::domain::file::DataFile;

use super::{confirm, download_path};
use crate::config::Config;

/// Data file subcommands
#[derive(Subcommand)]
pub enum FileCommands {
    /// List uploaded data files
    List,
    /// Upload spreadsheets (.xlsx, .xls, .csv)
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Download a data file
    Download {
        name: String,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete data files
    Delete {
        #[arg(required = true)]
        names: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle file commands
pub async fn handle_file_command(command: FileCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        FileCommands::List => list_files(&client).await,
        FileCommands::Upload { paths } => upload_files(&client, paths).await,
        FileCommands::Download { name, output } => download_file(&client, &name, output).await,
        FileCommands::Delete { names, yes } => delete_files(&client, names, yes).await,
    }
}

async fn list_files(client: &BackendClient) -> Result<()> {
    let files = client.list_files().await.context("Failed to load files")?;

    if files.is_empty() {
        println!("{}", "No files found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} file(s):", files.len()).bold());
    for file in files {
        print_file(&file);
    }

    Ok(())
}

fn print_file(file: &DataFile) {
    let modified = file
        .modified_at()
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default();

    println!(
        "  {} {}  {}  {}",
        "▸".cyan(),
        file.name,
        format_size(file.size),
        modified.dimmed()
    );
}

/// Uploads each file in turn; one failure does not stop the rest
async fn upload_files(client: &BackendClient, paths: Vec<PathBuf>) -> Result<()> {
    let mut failed = 0;

    for path in &paths {
        match client.upload_file(path).await {
            Ok(uploaded) => println!(
                "{} {} → {} ({})",
                "✓".green(),
                path.display(),
                uploaded.filename.cyan(),
                format_size(uploaded.size)
            ),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), path.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} upload(s) failed", failed, paths.len());
    }

    Ok(())
}

async fn download_file(client: &BackendClient, name: &str, output: Option<PathBuf>) -> Result<()> {
    let download = client
        .download_file(name)
        .await
        .with_context(|| format!("Failed to download {}", name))?;

    let path = download_path(output.as_deref(), download.file_name.as_deref(), name);

    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Saved {} ({})",
        "✓".green(),
        path.display().to_string().cyan(),
        format_size(download.bytes.len() as u64)
    );

    Ok(())
}

async fn delete_files(client: &BackendClient, names: Vec<String>, yes: bool) -> Result<()> {
    let prompt = match names.as_slice() {
        [single] => format!("Delete file {}?", single),
        many => format!("Delete {} files?", many.len()),
    };
    if !yes && !confirm(&prompt)? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let mut failed = 0;
    for name in &names {
        match client.delete_file(name).await {
            Ok(_) => println!("{} Deleted {}", "✓".green(), name),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), name, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} deletion(s) failed", failed, names.len());
    }

    Ok(())
}

/// Human-readable byte size
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3072.00 GB");
    }
}
