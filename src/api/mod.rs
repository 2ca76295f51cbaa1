//! API module for HTTP endpoints
//!
//! This module maps HTTP requests onto the event log and the report engine.

pub mod http;
pub mod rest;
pub mod state;

pub use http::{create_router, serve};
pub use state::AppState;
