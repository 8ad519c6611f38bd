//! High-load cell report command handlers
//!
//! Queries and exports the burst high-load cell report. Without explicit
//! bounds the window is the last whole hour.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, TimeDelta};
use clap::{Args, Subcommand};
use colored::*;
use metric_client::BackendClient;
use metric_core::domain::overload::{
    OverloadReport, OverloadWindow, PARAM_FORMAT, SystemStats, is_burst, parse_window_time,
};
use metric_core::domain::table::{ExportFormat, Row};

use super::download_path;
use crate::config::Config;

/// Report time window
#[derive(Args)]
pub struct WindowArgs {
    /// Window start, YYYY-MM-DD HH:MM[:SS] (default: one hour before the end)
    #[arg(long, value_parser = parse_window_time)]
    start: Option<NaiveDateTime>,

    /// Window end, YYYY-MM-DD HH:MM[:SS] (default: the last whole hour)
    #[arg(long, value_parser = parse_window_time)]
    end: Option<NaiveDateTime>,
}

impl WindowArgs {
    fn window(&self, now: NaiveDateTime) -> Result<OverloadWindow> {
        let end = self
            .end
            .unwrap_or_else(|| OverloadWindow::last_whole_hour(now).end());
        let start = self.start.unwrap_or(end - TimeDelta::hours(1));

        OverloadWindow::new(start, end).map_err(anyhow::Error::msg)
    }
}

/// Overload report subcommands
#[derive(Subcommand)]
pub enum OverloadCommands {
    /// Show per-system cell counts for a window
    Query {
        #[command(flatten)]
        window: WindowArgs,

        /// Also print the matching rows as JSON
        #[arg(long)]
        rows: bool,

        /// With --rows, print only burst high-load rows
        #[arg(long, requires = "rows")]
        burst_only: bool,
    },
    /// Export the rows of a window as CSV or XLSX
    Export {
        #[command(flatten)]
        window: WindowArgs,

        /// csv or xlsx
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Output file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle overload commands
pub async fn handle_overload_command(command: OverloadCommands, config: &Config) -> Result<()> {
    let client = config.client()?;
    let now = chrono::Local::now().naive_local();

    match command {
        OverloadCommands::Query {
            window,
            rows,
            burst_only,
        } => query(&client, window.window(now)?, rows, burst_only).await,
        OverloadCommands::Export {
            window,
            format,
            output,
        } => export(&client, window.window(now)?, format, output).await,
    }
}

async fn query(
    client: &BackendClient,
    window: OverloadWindow,
    rows: bool,
    burst_only: bool,
) -> Result<()> {
    let report = client
        .query_overload(&window)
        .await
        .context("Failed to query high-load cells")?;

    for line in summary_lines(&window, &report) {
        println!("{}", line);
    }

    if rows {
        let selected: Vec<&Row> = if burst_only {
            report.burst_rows().collect()
        } else {
            report.data.iter().collect()
        };
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else if report.total_count > 0 {
        let burst = report.data.iter().filter(|row| is_burst(row)).count();
        eprintln!(
            "{}",
            format!("{} row(s), {} burst; pass --rows to print them", report.total_count, burst)
                .dimmed()
        );
    }

    Ok(())
}

async fn export(
    client: &BackendClient,
    window: OverloadWindow,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let download = client
        .download_overload(&window, format)
        .await
        .context("Failed to export high-load cells")?;

    let path = download_path(
        output.as_deref(),
        download.file_name.as_deref(),
        &window.fallback_file_name(format),
    );

    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Exported high-load cells to {} ({} bytes)",
        "✓".green(),
        path.display().to_string().cyan(),
        download.bytes.len()
    );

    Ok(())
}

fn summary_lines(window: &OverloadWindow, report: &OverloadReport) -> Vec<String> {
    vec![
        format!(
            "{} {} → {}",
            "Window:".bold(),
            window.start().format(PARAM_FORMAT),
            window.end().format(PARAM_FORMAT)
        ),
        system_line("4G", &report.stats.lte),
        system_line("5G", &report.stats.nr),
        format!("{} {}", "Rows:".bold(), report.total_count),
    ]
}

/// "4G: 3 burst of 120 cells (important areas: 1 of 40)"
fn system_line(system: &str, stats: &SystemStats) -> String {
    let burst = if stats.burst > 0 {
        stats.burst.to_string().red().bold()
    } else {
        stats.burst.to_string().normal()
    };

    format!(
        "  {}: {} burst of {} cells (important areas: {} of {})",
        system.bold(),
        burst,
        stats.total,
        stats.burst_important,
        stats.total_important
    )
}
