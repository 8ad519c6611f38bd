//! Table command handlers
//!
//! Lists tables, prints pages of rows, clears and exports tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use metric_client::{BackendClient, fallback_export_name};
use metric_core::domain::table::ExportFormat;
use metric_core::dto::table::{DEFAULT_PAGE_SIZE, SearchFilter, TableDataQuery};

use super::{confirm, download_path};
use crate::config::Config;

/// Column substring filter
#[derive(Args)]
pub struct SearchArgs {
    /// Column to search in
    #[arg(long, requires = "value")]
    field: Option<String>,

    /// Substring to look for
    #[arg(long, requires = "field")]
    value: Option<String>,
}

impl SearchArgs {
    fn filter(&self) -> Option<SearchFilter> {
        match (&self.field, &self.value) {
            (Some(field), Some(value)) => SearchFilter::new(field.clone(), value.clone()),
            _ => None,
        }
    }
}

/// Table subcommands
#[derive(Subcommand)]
pub enum TableCommands {
    /// List tables with their row counts
    List,
    /// List the columns of a table
    Columns {
        table: String,
    },
    /// Print one page of rows as JSON
    Data {
        table: String,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page (at most 1000)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Count the rows of a table
    Count {
        table: String,
    },
    /// Delete every row of a table
    Clear {
        table: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export a table as CSV or XLSX
    Export {
        table: String,

        /// csv or xlsx
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

/// Handle table commands
pub async fn handle_table_command(command: TableCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        TableCommands::List => list_tables(&client).await,
        TableCommands::Columns { table } => list_columns(&client, &table).await,
        TableCommands::Data {
            table,
            page,
            page_size,
            search,
        } => {
            let query = TableDataQuery::page(page)
                .with_page_size(page_size)
                .with_search(search.filter());
            print_page(&client, &table, &query).await
        }
        TableCommands::Count { table } => {
            let count = client
                .count_rows(&table)
                .await
                .with_context(|| format!("Failed to count rows of {}", table))?;
            println!("{}", count);
            Ok(())
        }
        TableCommands::Clear { table, yes } => clear_table(&client, &table, yes).await,
        TableCommands::Export {
            table,
            format,
            output,
            search,
        } => export_table(&client, &table, format, output, search.filter()).await,
    }
}

async fn list_tables(client: &BackendClient) -> Result<()> {
    let tables = client.list_tables().await.context("Failed to load tables")?;

    if tables.is_empty() {
        println!("{}", "No tables found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} table(s):", tables.len()).bold());
    for table in tables {
        let count = match client.count_rows(&table).await {
            Ok(count) => count.to_string(),
            Err(e) => {
                tracing::warn!("Failed to count rows of {}: {}", table, e);
                "?".to_string()
            }
        };
        println!("  {} {} {}", "▸".cyan(), table, format!("({} rows)", count).dimmed());
    }

    Ok(())
}

async fn list_columns(client: &BackendClient, table: &str) -> Result<()> {
    let columns = client
        .table_columns(table)
        .await
        .with_context(|| format!("Failed to load columns of {}", table))?;

    for column in columns {
        println!("{}", column);
    }

    Ok(())
}

async fn print_page(client: &BackendClient, table: &str, query: &TableDataQuery) -> Result<()> {
    let page = client
        .table_page(table, query)
        .await
        .with_context(|| format!("Failed to load rows of {}", table))?;

    println!("{}", serde_json::to_string_pretty(&page.data)?);
    eprintln!(
        "{}",
        format!(
            "Page {}/{} ({} matching rows)",
            page.current_page,
            page.total_pages.max(1),
            page.total_count
        )
        .dimmed()
    );

    Ok(())
}

async fn clear_table(client: &BackendClient, table: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete all rows of table {}?", table))? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let cleared = client
        .clear_table(table)
        .await
        .with_context(|| format!("Failed to clear {}", table))?;

    println!(
        "{} {}",
        "✓".green(),
        format!("Deleted {} row(s) from {}", cleared.affected_rows, table).green()
    );

    Ok(())
}

async fn export_table(
    client: &BackendClient,
    table: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
    search: Option<SearchFilter>,
) -> Result<()> {
    let download = client
        .export_table(table, format, search.as_ref())
        .await
        .with_context(|| format!("Failed to export {}", table))?;

    let path = download_path(
        output.as_deref(),
        download.file_name.as_deref(),
        &fallback_export_name(table, format),
    );

    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Exported {} to {} ({} bytes)",
        "✓".green(),
        table,
        path.display().to_string().cyan(),
        download.bytes.len()
    );

    Ok(())
}
