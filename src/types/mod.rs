//! Data types for the Event Analytics service
//!
//! This module contains the core data structures shared by the event log,
//! the report engine and the HTTP API.

mod event;

pub use event::{EventRecord, NewEvent};

/// Result type for service entry points
pub type ServiceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
