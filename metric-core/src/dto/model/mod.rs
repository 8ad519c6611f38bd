//! Model DTOs

use serde::{Deserialize, Serialize};

use crate::domain::model::ModelInfo;

/// Envelope of `GET /api/models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<ModelInfo>,
}
