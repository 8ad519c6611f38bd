//! High-load cell report DTOs

use serde::{Deserialize, Serialize};

use crate::domain::overload::{OverloadWindow, PARAM_FORMAT};

/// Query string of `GET /api/query/overload` and its download variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadQuery {
    pub start_time: String,
    pub end_time: String,
}

impl From<&OverloadWindow> for OverloadQuery {
    fn from(window: &OverloadWindow) -> Self {
        Self {
            start_time: window.start().format(PARAM_FORMAT).to_string(),
            end_time: window.end().format(PARAM_FORMAT).to_string(),
        }
    }
}
