//! Metric table types

use serde::{Deserialize, Serialize};

/// A single table row, keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// One page of table rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePage {
    pub data: Vec<Row>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub columns: Vec<String>,
}

impl TablePage {
    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }
}

/// File format for a full table export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Value of the `format` query parameter, also used as file extension
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}
