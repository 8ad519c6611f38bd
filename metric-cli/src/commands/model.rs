//! Model command handlers
//!
//! Lists the backend's import models and executes them, following the
//! background task until it finishes.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use metric_client::execution::{ExecutionController, ExecutionError, ExecutionObserver};
use metric_core::domain::task::{TaskState, TaskStatus};

use crate::config::Config;

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// List available models
    List,
    /// Execute models and wait for the import to finish
    Execute {
        /// Model paths as shown by `model list`
        paths: Vec<String>,

        /// Execute every available model
        #[arg(long, conflicts_with = "paths")]
        all: bool,
    },
}

/// Handle model commands
pub async fn handle_model_command(command: ModelCommands, config: &Config) -> Result<()> {
    match command {
        ModelCommands::List => list_models(config).await,
        ModelCommands::Execute { paths, all } => execute_models(config, paths, all).await,
    }
}

/// List all models
async fn list_models(config: &Config) -> Result<()> {
    let client = config.client()?;
    let models = client.list_models().await.context("Failed to load models")?;

    if models.is_empty() {
        println!("{}", "No models found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} model(s):", models.len()).bold());
    println!();
    for model in models {
        println!("  {} {}", "▸".cyan(), model.name.bold());
        println!("    Path:   {}", model.path.dimmed());
        println!("    Files:  {}", model.file_pattern);
        println!("    Table:  {}", model.table);
        println!();
    }

    Ok(())
}

/// Execute models and follow the task
async fn execute_models(config: &Config, paths: Vec<String>, all: bool) -> Result<()> {
    let client = Arc::new(config.client()?);

    let paths = if all {
        client
            .list_models()
            .await
            .context("Failed to load models")?
            .into_iter()
            .map(|model| model.path)
            .collect()
    } else {
        paths
    };

    let controller =
        ExecutionController::new(client, Arc::new(TerminalObserver), config.poll.clone())
            .context("Invalid polling configuration")?;

    let handle = match controller.submit(paths).await {
        Ok(handle) => handle,
        Err(ExecutionError::Validation(_)) => {
            anyhow::bail!("Select at least one model (pass paths or --all)")
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} {}",
        "Task started:".bold(),
        handle.task_id().to_string().cyan()
    );

    let task_id = handle.task_id().clone();
    let outcome = tokio::select! {
        outcome = handle.wait() => outcome,
        _ = tokio::signal::ctrl_c() => {
            controller.teardown();
            println!();
            println!(
                "{}",
                format!("Stopped following task {}; it keeps running on the backend.", task_id)
                    .yellow()
            );
            return Ok(());
        }
    };

    execution_result(outcome)
}

/// Process result for a finished (or abandoned) execution
fn execution_result(outcome: Result<TaskStatus, ExecutionError>) -> Result<()> {
    match outcome {
        Ok(_) => Ok(()),
        Err(ExecutionError::JobFailure(message)) => {
            anyhow::bail!("Model execution failed: {}", message)
        }
        Err(e) => Err(e).context("Lost track of the model execution"),
    }
}

/// Prints task progress and the final result to the terminal
struct TerminalObserver;

impl ExecutionObserver for TerminalObserver {
    fn on_progress(&self, status: &TaskStatus) {
        if status.status == TaskState::Running {
            println!("  {} {}", "…".dimmed(), progress_line(status));
        }
    }

    fn on_terminal(&self, status: &TaskStatus) {
        println!();
        for line in terminal_lines(status) {
            println!("{}", line);
        }
    }

    fn on_error(&self, error: &ExecutionError) {
        eprintln!("{} {}", "✗".red(), error.to_string().red());
    }
}

/// "label (progress/total) · 12s"
fn progress_line(status: &TaskStatus) -> String {
    let mut line = format!("{} ({}/{})", status.current, status.progress, status.total);
    if let Some(secs) = status.elapsed_secs() {
        line.push_str(&format!(" · {}s", secs));
    }
    line
}

fn terminal_lines(status: &TaskStatus) -> Vec<String> {
    let mut lines = Vec::new();

    match status.status {
        TaskState::Completed => {
            let elapsed = status
                .elapsed_secs()
                .map(|secs| format!(" (took {}s)", secs))
                .unwrap_or_default();
            lines.push(format!(
                "{} {}{}",
                "✓".green(),
                "Execution completed".green().bold(),
                elapsed.dimmed()
            ));
            lines.push(format!("{}", "Results:".bold()));
            for (path, count) in &status.results {
                lines.push(format!("  {}: imported {} row(s)", file_name(path).cyan(), count));
            }
        }
        TaskState::Failed => {
            lines.push(format!("{} {}", "✗".red(), "Execution failed".red().bold()));
            lines.push(format!(
                "  Error: {}",
                status.error.as_deref().unwrap_or("unknown error")
            ));
        }
        TaskState::Running => {}
    }

    lines
}

/// Last component of a backend path, which may use either separator
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
