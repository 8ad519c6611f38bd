//! Model configuration types

use serde::{Deserialize, Serialize};

/// A model (import configuration) available on the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Configuration file stem
    pub name: String,
    /// Path of the configuration on the backend; this is what gets executed
    pub path: String,
    /// Glob of the data files the model imports
    #[serde(default)]
    pub file_pattern: String,
    /// Destination table
    #[serde(default)]
    pub table: String,
}
