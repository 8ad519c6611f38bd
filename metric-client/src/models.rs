//! Model-related API endpoints

use metric_core::domain::model::ModelInfo;
use metric_core::domain::task::{TaskId, TaskStatus};
use metric_core::dto::model::ModelList;
use metric_core::dto::task::ExecuteModelsResponse;

use crate::BackendClient;
use crate::error::Result;

impl BackendClient {
    // =============================================================================
    // Models
    // =============================================================================

    /// List the model configurations known to the backend
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint(&["api", "models"])?;
        let response = self.client.get(url).send().await?;

        let list: ModelList = self.handle_response(response).await?;
        Ok(list.models)
    }

    // =============================================================================
    // Model Execution Tasks
    // =============================================================================

    /// Start a background task executing the given models in order
    ///
    /// # Arguments
    /// * `model_paths` - Backend paths of the model configurations
    ///
    /// # Returns
    /// The identifier of the started task
    pub async fn execute_models(&self, model_paths: &[String]) -> Result<TaskId> {
        let url = self.endpoint(&["api", "models", "execute"])?;
        let response = self.client.post(url).json(model_paths).send().await?;

        let started: ExecuteModelsResponse = self.handle_response(response).await?;
        Ok(started.task_id)
    }

    /// Get the current status of a model-execution task
    pub async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus> {
        let url = self.endpoint(&["api", "models", "execute", task_id.as_str()])?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
