//! Table DTOs

use serde::{Deserialize, Serialize};

/// Envelope of `GET /api/tables`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableList {
    pub tables: Vec<String>,
}

/// Envelope of `GET /api/tables/{table}/columns`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnList {
    pub columns: Vec<String>,
}

/// Envelope of `GET /api/tables/{table}/count`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCount {
    pub table: String,
    pub count: u64,
}

/// Response of `DELETE /api/tables/{table}/data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearTableResponse {
    pub message: String,
    pub affected_rows: i64,
}

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Substring filter on a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(rename = "search_field")]
    pub field: String,
    #[serde(rename = "search_value")]
    pub value: String,
}

impl SearchFilter {
    /// Builds a filter; the backend ignores a search unless both parts are set
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Option<Self> {
        let field = field.into();
        let value = value.into();
        if field.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self { field, value })
    }
}

/// Query string of `GET /api/tables/{table}/data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDataQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchFilter>,
}

impl TableDataQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_search(mut self, search: Option<SearchFilter>) -> Self {
        self.search = search;
        self
    }

    /// Checks the bounds the backend enforces
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be at least 1".to_string());
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        Ok(())
    }
}

impl Default for TableDataQuery {
    fn default() -> Self {
        Self::page(1)
    }
}
