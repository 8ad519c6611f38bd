//! MetricHandel HTTP Client
//!
//! A typed client for the MetricHandel backend API, plus the controller that
//! submits model-execution tasks and follows them to completion.
//!
//! # Example
//!
//! ```no_run
//! use metric_client::BackendClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::new("http://localhost:8000");
//!
//!     for table in client.list_tables().await? {
//!         println!("{}: {} rows", table, client.count_rows(&table).await?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
mod files;
mod models;
mod overload;
mod tables;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use tables::{Download, fallback_export_name};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the MetricHandel backend API
///
/// Endpoints are grouped by resource:
/// - Tables (list, columns, paged data, count, clear, export)
/// - Models (list, execute, task status)
/// - Data files (list, upload, download, delete)
/// - High-load cell report (query, export)
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Example
    /// ```
    /// use metric_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    ///
    /// Each segment is percent-encoded, so table and file names may contain
    /// spaces, slashes or non-ASCII characters.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Base URL '{}' cannot be a base",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Fail with an `ApiError` unless the response status is a success
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        Ok(response)
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
