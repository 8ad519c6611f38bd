//! MetricHandel CLI
//!
//! Command-line interface for the MetricHandel backend: browse and export
//! metric tables, manage uploaded data files and run import models.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use metric_client::execution::PollConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "metric")]
#[command(about = "MetricHandel data console", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "METRIC_BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, env = "METRIC_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Interval between task status checks, in milliseconds
    #[arg(long, env = "METRIC_POLL_INTERVAL_MS", default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Failed status checks tolerated in a row before giving up on a task
    #[arg(long, env = "METRIC_POLL_RETRIES", default_value_t = 0)]
    poll_retries: u32,

    /// Stop following a task after this many seconds
    #[arg(long, env = "METRIC_MAX_DURATION_SECS")]
    max_duration_secs: Option<u64>,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            backend_url: self.backend_url.clone(),
            request_timeout: (self.timeout_secs > 0)
                .then(|| Duration::from_secs(self.timeout_secs)),
            poll: PollConfig::default()
                .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
                .with_max_poll_retries(self.poll_retries)
                .with_max_duration(self.max_duration_secs.map(Duration::from_secs)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "metric_cli=info,metric_client=info"
    } else {
        "metric_cli=warn,metric_client=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    config.validate()?;

    handle_command(cli.command, &config).await
}
