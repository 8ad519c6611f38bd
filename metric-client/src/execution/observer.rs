//! Presentation hooks for tracked tasks

use metric_core::domain::task::TaskStatus;

use super::error::ExecutionError;

/// Receives updates about the task a controller is tracking
///
/// Callbacks run on the poll task and should return quickly.
pub trait ExecutionObserver: Send + Sync {
    /// Called with every status response, including the terminal one
    fn on_progress(&self, _status: &TaskStatus) {}

    /// Called exactly once when the backend reports `completed` or `failed`
    fn on_terminal(&self, status: &TaskStatus);

    /// Called when tracking ends without a terminal status
    fn on_error(&self, _error: &ExecutionError) {}
}

/// Observer that ignores every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {
    fn on_terminal(&self, _status: &TaskStatus) {}
}
