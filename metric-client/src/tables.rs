//! Table-related API endpoints

use metric_core::domain::table::{ExportFormat, TablePage};
use metric_core::dto::table::{
    ClearTableResponse, ColumnList, SearchFilter, TableCount, TableDataQuery, TableList,
};
use reqwest::header::CONTENT_DISPOSITION;
use urlencoding::decode;

use crate::BackendClient;
use crate::error::{ClientError, Result};

/// A downloaded file body
#[derive(Debug, Clone)]
pub struct Download {
    /// File name suggested by the backend, if any
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl BackendClient {
    // =============================================================================
    // Table Browsing
    // =============================================================================

    /// List all table names
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["api", "tables"])?;
        let response = self.client.get(url).send().await?;

        let list: TableList = self.handle_response(response).await?;
        Ok(list.tables)
    }

    /// List the column names of a table
    pub async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["api", "tables", table, "columns"])?;
        let response = self.client.get(url).send().await?;

        let list: ColumnList = self.handle_response(response).await?;
        Ok(list.columns)
    }

    /// Fetch one page of rows, optionally filtered by a column substring
    pub async fn table_page(&self, table: &str, query: &TableDataQuery) -> Result<TablePage> {
        query.validate().map_err(ClientError::InvalidRequest)?;

        let url = self.endpoint(&["api", "tables", table, "data"])?;
        let response = self.client.get(url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Count the rows of a table
    pub async fn count_rows(&self, table: &str) -> Result<u64> {
        let url = self.endpoint(&["api", "tables", table, "count"])?;
        let response = self.client.get(url).send().await?;

        let count: TableCount = self.handle_response(response).await?;
        Ok(count.count)
    }

    // =============================================================================
    // Table Maintenance
    // =============================================================================

    /// Delete every row of a table
    ///
    /// # Returns
    /// The backend's acknowledgement, including the number of deleted rows
    pub async fn clear_table(&self, table: &str) -> Result<ClearTableResponse> {
        let url = self.endpoint(&["api", "tables", table, "data"])?;
        let response = self.client.delete(url).send().await?;

        let cleared: ClearTableResponse = self.handle_response(response).await?;
        tracing::info!("Cleared table {} ({} rows)", table, cleared.affected_rows);

        Ok(cleared)
    }

    /// Export a whole table (all pages) as CSV or XLSX
    pub async fn export_table(
        &self,
        table: &str,
        format: ExportFormat,
        search: Option<&SearchFilter>,
    ) -> Result<Download> {
        let url = self.endpoint(&["api", "tables", table, "download"])?;
        let mut request = self.client.get(url).query(&[("format", format.as_str())]);
        if let Some(search) = search {
            request = request.query(search);
        }
        let response = request.send().await?;

        self.handle_download(response).await
    }

    /// Read a binary response together with its suggested file name
    pub(crate) async fn handle_download(&self, response: reqwest::Response) -> Result<Download> {
        let response = self.check_status(response).await?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_file_name);
        let bytes = response.bytes().await?.to_vec();

        Ok(Download { file_name, bytes })
    }
}

/// Extract the file name from a `Content-Disposition` header
///
/// Prefers the RFC 5987 `filename*=UTF-8''...` form, which the backend uses
/// for non-ASCII table names, over a plain `filename=`.
pub(crate) fn attachment_file_name(header: &str) -> Option<String> {
    let mut plain = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');

        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = match value.split_once("''") {
                    Some((_charset, encoded)) => encoded,
                    None => value,
                };
                if let Ok(decoded) = decode(encoded) {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" if !value.is_empty() => plain = Some(value.to_string()),
            _ => {}
        }
    }

    plain
}

/// Local name for an export the backend did not name
pub fn fallback_export_name(table: &str, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        table,
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        format.as_str()
    )
}
