//! Data Transfer Objects for the backend REST API
//!
//! The backend wraps most payloads in a small JSON envelope
//! (`{"tables": [...]}`, `{"files": [...]}`, ...). These DTOs describe those
//! envelopes and the query parameters the API accepts.

pub mod file;
pub mod model;
pub mod overload;
pub mod table;
pub mod task;
