//! Data file DTOs

use serde::{Deserialize, Serialize};

use crate::domain::file::DataFile;

/// Envelope of `GET /api/files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileList {
    pub files: Vec<DataFile>,
}

/// Result of an upload; `filename` may differ from the local name when the
/// backend had to avoid a collision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub size: u64,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
