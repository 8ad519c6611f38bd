//! Backend calls used by the execution controller

use async_trait::async_trait;
use metric_core::domain::task::{TaskId, TaskStatus};

use crate::BackendClient;
use crate::error::Result;

/// Submission and status endpoints of the backend's task API
///
/// Implemented by [`BackendClient`]; tests substitute scripted backends.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Start a task over the given inputs and return its identifier
    async fn submit(&self, inputs: &[String]) -> Result<TaskId>;

    /// Fetch the current status of a task
    async fn status(&self, task_id: &TaskId) -> Result<TaskStatus>;
}

#[async_trait]
impl TaskApi for BackendClient {
    async fn submit(&self, inputs: &[String]) -> Result<TaskId> {
        self.execute_models(inputs).await
    }

    async fn status(&self, task_id: &TaskId) -> Result<TaskStatus> {
        self.task_status(task_id).await
    }
}
