//! Data file types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extensions the backend accepts for uploads
pub const UPLOAD_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

/// A file in the backend's data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time as Unix seconds
    pub modified: f64,
}

impl DataFile {
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        if !self.modified.is_finite() {
            return None;
        }
        let secs = self.modified.trunc() as i64;
        let nanos = (self.modified.fract() * 1e9) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Whether the backend will accept an upload with this file name
pub fn is_supported_upload(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}
