//! Data file API endpoints

use std::path::Path;

use metric_core::domain::file::{DataFile, UPLOAD_EXTENSIONS, is_supported_upload};
use metric_core::dto::file::{FileList, MessageResponse, UploadResponse};
use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, Result};
use crate::{BackendClient, Download};

impl BackendClient {
    /// List the files in the backend's data directory
    pub async fn list_files(&self) -> Result<Vec<DataFile>> {
        let url = self.endpoint(&["api", "files"])?;
        let response = self.client.get(url).send().await?;

        let list: FileList = self.handle_response(response).await?;
        Ok(list.files)
    }

    /// Upload a spreadsheet from disk
    ///
    /// Only `.xlsx`, `.xls` and `.csv` files are accepted; anything else is
    /// rejected before the file is read.
    ///
    /// # Returns
    /// The upload acknowledgement; `filename` is the name the backend stored
    /// the file under, which gets a numeric suffix on collisions
    pub async fn upload_file(&self, path: &Path) -> Result<UploadResponse> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::InvalidRequest(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();

        if !is_supported_upload(&file_name) {
            return Err(ClientError::InvalidRequest(format!(
                "Unsupported file type '{}'; allowed: {}",
                file_name,
                UPLOAD_EXTENSIONS.join(", ")
            )));
        }

        let content = tokio::fs::read(path).await?;
        self.upload_bytes(&file_name, content).await
    }

    /// Upload an in-memory file body under the given name
    pub async fn upload_bytes(&self, file_name: &str, content: Vec<u8>) -> Result<UploadResponse> {
        let url = self.endpoint(&["api", "files", "upload"])?;
        let form = Form::new().part("file", Part::bytes(content).file_name(file_name.to_string()));
        let response = self.client.post(url).multipart(form).send().await?;

        let uploaded: UploadResponse = self.handle_response(response).await?;
        tracing::info!("Uploaded {} as {}", file_name, uploaded.filename);

        Ok(uploaded)
    }

    /// Download a data file
    pub async fn download_file(&self, file_name: &str) -> Result<Download> {
        let url = self.endpoint(&["api", "files", file_name, "download"])?;
        let response = self.client.get(url).send().await?;

        let mut download = self.handle_download(response).await?;
        if download.file_name.is_none() {
            download.file_name = Some(file_name.to_string());
        }

        Ok(download)
    }

    /// Delete a data file
    pub async fn delete_file(&self, file_name: &str) -> Result<MessageResponse> {
        let url = self.endpoint(&["api", "files", file_name])?;
        let response = self.client.delete(url).send().await?;

        self.handle_response(response).await
    }
}
