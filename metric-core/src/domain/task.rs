//! Model-execution task types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque task identifier handed out by the backend on submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Task execution state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Running,
    Completed,
    Failed,
}

impl TaskState {
    /// Whether no further status changes will follow
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// Status payload of a model-execution task
///
/// The backend only ever mutates this; clients read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: TaskState,
    /// Human-readable label of the step being processed
    #[serde(default)]
    pub current: String,
    /// Index of the step being processed (equals `total` once completed)
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub total: u32,
    /// Seconds since the task started
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    /// Imported row count per model path
    #[serde(default)]
    pub results: BTreeMap<String, u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskStatus {
    /// Elapsed time rounded to whole seconds, if the backend reported one
    pub fn elapsed_secs(&self) -> Option<u64> {
        self.elapsed_time
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| secs.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_payload_parses() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"status":"running","progress":1,"total":3,"current":"processing: a.json",
                "results":{},"error":null,"start_time":1700000000.5,"elapsed_time":2.4}"#,
        )
        .unwrap();

        assert_eq!(status.status, TaskState::Running);
        assert_eq!(status.progress, 1);
        assert_eq!(status.total, 3);
        assert_eq!(status.elapsed_secs(), Some(2));
        assert!(status.results.is_empty());
        assert!(status.error.is_none());
    }

    #[test]
    fn test_completed_payload_carries_results() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"status":"completed","progress":2,"total":2,"current":"done",
                "results":{"Models/a.json":10,"Models/b.json":0},"elapsed_time":7.6}"#,
        )
        .unwrap();

        assert!(status.status.is_terminal());
        assert_eq!(status.results.get("Models/a.json"), Some(&10));
        assert_eq!(status.elapsed_secs(), Some(8));
    }

    #[test]
    fn test_failed_payload_without_elapsed_time() {
        let status: TaskStatus =
            serde_json::from_str(r#"{"status":"failed","error":"bad config"}"#).unwrap();

        assert_eq!(status.status, TaskState::Failed);
        assert_eq!(status.error.as_deref(), Some("bad config"));
        assert_eq!(status.elapsed_secs(), None);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        assert!(serde_json::from_str::<TaskStatus>(r#"{"status":"paused"}"#).is_err());
    }

    #[test]
    fn test_task_id_is_transparent() {
        let id: TaskId = serde_json::from_str(r#""abc-123""#).unwrap();
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(id.to_string(), "abc-123");
    }
}
