//! MetricHandel Core
//!
//! Wire types shared by the MetricHandel client crates.
//!
//! This crate contains:
//! - Domain types: tables, models, data files and model-execution tasks
//! - DTOs: request/response envelopes of the backend REST API

pub mod domain;
pub mod dto;
