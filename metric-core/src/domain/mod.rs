//! Core domain types
//!
//! These types mirror the entities the MetricHandel backend exposes: metric
//! tables in its database, model (import) configurations, uploaded data files,
//! the background tasks that execute models and the high-load cell report.

pub mod file;
pub mod model;
pub mod overload;
pub mod table;
pub mod task;
