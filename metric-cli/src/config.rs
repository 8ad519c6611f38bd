//! Configuration module
//!
//! Handles CLI configuration: where the backend lives and how model
//! executions are polled.

use std::time::Duration;

use anyhow::{Context, Result};
use metric_client::BackendClient;
use metric_client::execution::PollConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the MetricHandel backend
    pub backend_url: String,
    /// Per-request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
    /// Polling settings for model executions
    pub poll: PollConfig,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend URL must start with http:// or https://");
        }

        self.poll.validate().context("Invalid polling configuration")?;

        Ok(())
    }

    /// Builds a backend client from this configuration
    pub fn client(&self) -> Result<BackendClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(BackendClient::with_client(self.backend_url.clone(), http))
    }
}
