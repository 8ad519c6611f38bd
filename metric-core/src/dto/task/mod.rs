//! Task DTOs

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskId;

/// Response to a model-execution submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteModelsResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub message: Option<String>,
}
