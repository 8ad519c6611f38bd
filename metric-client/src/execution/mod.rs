//! Model-execution tracking
//!
//! The backend runs models as background tasks. This module submits a task
//! and polls its status at a fixed interval until it completes or fails:
//!
//! - [`TaskApi`]: the two backend calls the controller needs
//! - [`ExecutionController`]: owns the in-flight task and its poll timer
//! - [`ExecutionObserver`]: receives progress and the terminal status
//! - [`TaskHandle`]: per-submission view of the latest status and outcome

mod api;
mod config;
mod controller;
mod error;
mod observer;

pub use api::TaskApi;
pub use config::{ConfigError, PollConfig};
pub use controller::{ControllerPhase, ExecutionController, TaskHandle};
pub use error::ExecutionError;
pub use observer::{ExecutionObserver, NoopObserver};
