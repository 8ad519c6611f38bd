//! Errors surfaced by the execution controller

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::error::ClientError;

/// Why a submission was refused or a tracked task did not complete
///
/// Cloneable so the same outcome can be handed to the observer and to every
/// [`TaskHandle`](super::TaskHandle) waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// Submission rejected before any request was made
    #[error("Invalid submission: {0}")]
    Validation(String),

    /// A task is already being tracked
    #[error("A task is already running; wait for it to finish")]
    AlreadyRunning,

    /// The submission request failed; nothing is tracked
    #[error("Failed to start task: {0}")]
    SubmissionTransport(#[source] Arc<ClientError>),

    /// A status request failed; tracking was abandoned
    #[error("Failed to get task status: {0}")]
    PollingTransport(#[source] Arc<ClientError>),

    /// The backend reported the task as failed
    #[error("Task failed: {0}")]
    JobFailure(String),

    /// The task did not reach a terminal state within the configured limit
    #[error("Task did not finish within {0:?}")]
    PollTimeout(Duration),

    /// Tracking was torn down before the outcome was known
    #[error("Task tracking stopped")]
    TrackingStopped,
}

impl ExecutionError {
    /// Whether the submission was refused without contacting the backend
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AlreadyRunning)
    }
}
