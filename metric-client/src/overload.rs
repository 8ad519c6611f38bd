//! High-load cell report endpoints

use metric_core::domain::overload::{OverloadReport, OverloadWindow};
use metric_core::domain::table::ExportFormat;
use metric_core::dto::overload::OverloadQuery;

use crate::error::Result;
use crate::{BackendClient, Download};

impl BackendClient {
    /// Run the high-load cell query over `window`
    pub async fn query_overload(&self, window: &OverloadWindow) -> Result<OverloadReport> {
        let url = self.endpoint(&["api", "query", "overload"])?;
        let query = OverloadQuery::from(window);
        let response = self.client.get(url).query(&query).send().await?;

        let report: OverloadReport = self.handle_response(response).await?;
        tracing::info!(
            "Overload report {} - {}: {} row(s)",
            query.start_time,
            query.end_time,
            report.total_count
        );

        Ok(report)
    }

    /// Export the high-load cell rows of `window`
    ///
    /// The backend answers 404 when the window holds no rows.
    pub async fn download_overload(
        &self,
        window: &OverloadWindow,
        format: ExportFormat,
    ) -> Result<Download> {
        let url = self.endpoint(&["api", "query", "overload", "download"])?;
        let response = self
            .client
            .get(url)
            .query(&OverloadQuery::from(window))
            .query(&[("format", format.as_str())])
            .send()
            .await?;

        self.handle_download(response).await
    }
}
